//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — project config, build record, report structs.
//! - `constants.rs` — stable defaults and the loader patch strings.
//!
//! Domain types are data-only: no filesystem or process side effects.
//!
//! ## Compatibility note
//! Report structs back the `--json` output. Keep schema-impacting changes in
//! sync with `docs/contracts/*`.

pub mod constants;
pub mod models;
