//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` — init/validate/doctor, which run without a loaded project.
//! - `build.rs` — build/sources/flags/patch/profiles/status/clean.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate build logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod build;

pub use admin::handle_admin_commands;
pub use build::handle_build_commands;
