use crate::domain::constants::{DEFAULT_COMPILER, DEFAULT_EXCLUDE_PREFIX, DEFAULT_PROFILE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn default_compiler() -> String {
    DEFAULT_COMPILER.to_string()
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["cpp".to_string(), "c".to_string(), "cc".to_string()]
}

fn default_exclude_prefixes() -> Vec<String> {
    vec![DEFAULT_EXCLUDE_PREFIX.to_string()]
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_required() -> bool {
    true
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Contents of `emkit.toml`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
    /// Loader output, relative to `source_root`.
    pub output: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude_prefixes")]
    pub exclude_prefixes: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub pre_source_flags: Vec<String>,
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default = "default_profile")]
    pub default_profile: String,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    pub patches: Vec<LoaderPatch>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Features {
    #[serde(default)]
    pub threads: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pthread_pool_size: Option<String>,
    #[serde(default)]
    pub simd: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_memory: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_memory: Option<u64>,
    #[serde(default)]
    pub allow_memory_growth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webgl: Option<u8>,
    #[serde(default)]
    pub full_es3: bool,
    #[serde(default)]
    pub modularize: bool,
    #[serde(default)]
    pub export_es6: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    #[serde(default)]
    pub exported_functions: Vec<String>,
    #[serde(default)]
    pub exported_runtime_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtti: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_level: Option<String>,
    #[serde(default)]
    pub debug_info: bool,
    #[serde(default)]
    pub assertions: bool,
    #[serde(default)]
    pub fast_math: bool,
    /// Overrides `features.exceptions` for this profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<bool>,
    /// Overrides `features.rtti` for this profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtti: Option<bool>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoaderPatch {
    pub find: String,
    pub replace: String,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Target file relative to `source_root`; defaults to the build output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// One-shot extras layered over the config for a single invocation.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub compiler: Option<String>,
    pub defines: Vec<String>,
    pub flags: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CompilerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: String,
}

impl CompilerCommand {
    pub fn display_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    pub version: u32,
    #[serde(default)]
    pub builds: BTreeMap<String, BuildRecord>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BuildRecord {
    pub profile: String,
    pub fingerprint: String,
    pub output: String,
    pub status: String,
    pub exit_code: Option<i32>,
    pub source_count: usize,
    pub finished_at: u64,
}

#[derive(Serialize, Clone, Debug)]
pub struct PatchReport {
    pub file: String,
    pub status: String,
    pub replacements: usize,
}

#[derive(Serialize)]
pub struct BuildReport {
    pub profile: String,
    pub status: String,
    pub fingerprint: String,
    pub output: String,
    pub source_count: usize,
    pub command: CompilerCommand,
    pub exit_code: Option<i32>,
    pub patches: Vec<PatchReport>,
}

#[derive(Serialize)]
pub struct ProfileItem {
    pub name: String,
    pub default: bool,
    pub opt_level: Option<String>,
    pub debug_info: bool,
}

#[derive(Serialize)]
pub struct CleanReport {
    pub removed: Vec<String>,
    pub cleared_records: usize,
}

#[derive(Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct DoctorReport {
    pub overall: String,
    pub checks: Vec<CheckItem>,
}
