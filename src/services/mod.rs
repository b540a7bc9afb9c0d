//! Service layer containing build logic and side-effect helpers.
//!
//! ## Service map
//! - `config.rs` — `emkit.toml` loading, validation, env expansion, presets.
//! - `discovery.rs` — recursive source listing with prefix exclusion.
//! - `flags.rs` — compiler argument assembly (pure).
//! - `compiler.rs` — the single compiler process invocation.
//! - `patch.rs` — literal find/replace passes over the loader output.
//! - `fingerprint.rs` — content hash used by `build --if-changed`.
//! - `pipeline.rs` — the sequential build: discover, assemble, compile, patch.
//! - `storage.rs` — build record persistence + audit log.
//! - `doctor.rs` — environment checks.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod compiler;
pub mod config;
pub mod discovery;
pub mod doctor;
pub mod fingerprint;
pub mod flags;
pub mod output;
pub mod patch;
pub mod pipeline;
pub mod storage;
