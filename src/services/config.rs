use crate::cli::Preset;
use crate::domain::constants::{CONTEXT_ATTRS_DESYNCHRONIZED, CONTEXT_ATTRS_FIND, STATE_DIR};
use crate::domain::models::{Features, LoaderPatch, Overrides, Profile, ProjectConfig};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config not found: {0} (run `emkit init` to create one)")]
    NotFound(String),
    #[error("environment variable not set: {0}")]
    MissingEnv(String),
    #[error("unterminated variable reference in: {0}")]
    UnterminatedVar(String),
    #[error("unknown profile: {0}")]
    UnknownProfile(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A loaded config plus the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct Project {
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    pub fn source_root(&self) -> PathBuf {
        // Collecting components drops `.` segments; `..` is kept as written.
        self.base_dir
            .join(&self.config.source_root)
            .components()
            .collect()
    }

    pub fn output_path(&self) -> PathBuf {
        self.source_root()
            .join(&self.config.output)
            .components()
            .collect()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.base_dir.join(STATE_DIR)
    }

    /// Resolves a profile by name, falling back to `default_profile`.
    /// A project without any `[profiles]` table gets an empty default profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name.unwrap_or(self.config.default_profile.as_str());
        match self.config.profiles.get(name) {
            Some(p) => Ok((name.to_string(), p.clone())),
            None if self.config.profiles.is_empty() && name == self.config.default_profile => {
                Ok((name.to_string(), Profile::default()))
            }
            None => Err(ConfigError::UnknownProfile(name.to_string())),
        }
    }

    /// Compiler path after overrides and variable expansion.
    pub fn compiler_program(&self, overrides: &Overrides) -> Result<String, ConfigError> {
        let raw = overrides
            .compiler
            .as_deref()
            .unwrap_or(self.config.compiler.as_str());
        let expanded = expand_env(raw)?;
        let has_separator = expanded.contains('/') || expanded.contains('\\');
        if !has_separator {
            return Ok(expanded);
        }
        let mut path = PathBuf::from(&expanded);
        if path.is_relative() {
            path = self.base_dir.join(path);
        }
        if cfg!(windows) && path.extension().is_none() && !path.exists() {
            let bat = path.with_extension("bat");
            if bat.exists() {
                path = bat;
            }
        }
        Ok(path.to_string_lossy().to_string())
    }
}

pub fn load_project(config_path: &Path) -> anyhow::Result<Project> {
    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path.display().to_string()).into());
    }
    let absolute = if config_path.is_absolute() {
        config_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(config_path)
    };
    let raw = std::fs::read_to_string(&absolute)
        .with_context(|| format!("reading {}", absolute.display()))?;
    let config: ProjectConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", absolute.display()))?;
    validate(&config)?;
    let base_dir = absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    log::debug!("loaded config {}", absolute.display());
    Ok(Project {
        config_path: absolute,
        base_dir,
        config,
    })
}

pub fn validate(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.output.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("`output` must not be empty".to_string()));
    }
    if config.extensions.is_empty() {
        return Err(ConfigError::Invalid(
            "`extensions` must list at least one extension".to_string(),
        ));
    }
    if let Some(ext) = config
        .extensions
        .iter()
        .find(|e| e.is_empty() || e.starts_with('.'))
    {
        return Err(ConfigError::Invalid(format!(
            "extension `{}` must be non-empty and written without a leading dot",
            ext
        )));
    }
    if !config.profiles.is_empty() && !config.profiles.contains_key(&config.default_profile) {
        return Err(ConfigError::UnknownProfile(config.default_profile.clone()));
    }
    if let Some(v) = config.features.webgl {
        if v != 1 && v != 2 {
            return Err(ConfigError::Invalid(format!(
                "`features.webgl` must be 1 or 2, got {}",
                v
            )));
        }
    }
    if config.patches.iter().any(|p| p.find.is_empty()) {
        return Err(ConfigError::Invalid(
            "patch `find` must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expands `%VAR%`, `$VAR` and `${VAR}` references.
/// A lone `%` or `$` not followed by a variable name is kept literally.
pub fn expand_env(raw: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(|c: char| c == '%' || c == '$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let (name, consumed) = if let Some(after) = tail.strip_prefix('%') {
            match after.find('%') {
                Some(end) if end > 0 && after[..end].chars().all(is_var_char) => {
                    (&after[..end], end + 2)
                }
                _ => {
                    out.push('%');
                    rest = after;
                    continue;
                }
            }
        } else if let Some(after) = tail.strip_prefix("${") {
            match after.find('}') {
                Some(end) if end > 0 => (&after[..end], end + 3),
                _ => return Err(ConfigError::UnterminatedVar(raw.to_string())),
            }
        } else {
            let after = &tail[1..];
            let end = after
                .find(|c: char| !is_var_char(c))
                .unwrap_or(after.len());
            if end == 0 {
                out.push('$');
                rest = after;
                continue;
            }
            (&after[..end], end + 1)
        };
        let value =
            std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))?;
        out.push_str(&value);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn preset_config(preset: &Preset) -> ProjectConfig {
    let mut profiles = BTreeMap::new();
    match preset {
        Preset::Editor => {
            profiles.insert(
                "debug".to_string(),
                Profile {
                    debug_info: true,
                    assertions: true,
                    exceptions: Some(true),
                    defines: strings(&["GK_CONF_DEBUG=1"]),
                    flags: strings(&["-fdebug-compilation-dir=../wasm-src"]),
                    ..Profile::default()
                },
            );
            profiles.insert(
                "release".to_string(),
                Profile {
                    opt_level: Some("3".to_string()),
                    fast_math: true,
                    exceptions: Some(false),
                    rtti: Some(false),
                    defines: strings(&["GK_CONF_DIST=1", "EMSCRIPTEN_HAS_UNBOUND_TYPE_NAMES=0"]),
                    ..Profile::default()
                },
            );
            ProjectConfig {
                compiler: crate::domain::constants::DEFAULT_COMPILER.to_string(),
                source_root: PathBuf::from("."),
                output: PathBuf::from("../src/wasm/editor.js"),
                std: Some("c++17".to_string()),
                extensions: strings(&["cpp", "c", "cc"]),
                exclude_prefixes: strings(&["debug"]),
                libraries: strings(&["embind"]),
                defines: strings(&["EMSCRIPTEN=1"]),
                pre_source_flags: vec![],
                settings: vec![],
                flags: vec![],
                default_profile: "release".to_string(),
                features: Features {
                    allow_memory_growth: true,
                    export_es6: true,
                    modularize: true,
                    webgl: Some(2),
                    full_es3: true,
                    exported_functions: strings(&["_malloc", "_free"]),
                    exported_runtime_methods: strings(&["cwrap", "allocateUTF8"]),
                    ..Features::default()
                },
                profiles,
                patches: vec![LoaderPatch {
                    find: CONTEXT_ATTRS_FIND.to_string(),
                    replace: CONTEXT_ATTRS_DESYNCHRONIZED.to_string(),
                    required: true,
                    file: None,
                }],
            }
        }
        Preset::Threaded => {
            profiles.insert(
                "debug".to_string(),
                Profile {
                    debug_info: true,
                    defines: strings(&["GK_CONF_DEBUG=1"]),
                    flags: strings(&["-fdebug-compilation-dir=../wasm-dev-src"]),
                    ..Profile::default()
                },
            );
            profiles.insert(
                "release".to_string(),
                Profile {
                    opt_level: Some("3".to_string()),
                    defines: strings(&["GK_CONF_DIST=1"]),
                    ..Profile::default()
                },
            );
            ProjectConfig {
                compiler: crate::domain::constants::DEFAULT_COMPILER.to_string(),
                source_root: PathBuf::from("."),
                output: PathBuf::from("../public/editor.js"),
                std: Some("c++20".to_string()),
                extensions: strings(&["cpp", "c", "cc"]),
                exclude_prefixes: strings(&["debug"]),
                libraries: strings(&["embind"]),
                defines: strings(&[
                    "EMSCRIPTEN=1",
                    "SIMD_GENERIC",
                    "EMSCRIPTEN_HAS_UNBOUND_TYPE_NAMES=0",
                ]),
                pre_source_flags: vec![],
                settings: vec![],
                flags: vec![],
                default_profile: "release".to_string(),
                features: Features {
                    threads: true,
                    pthread_pool_size: Some("navigator.hardwareConcurrency".to_string()),
                    simd: true,
                    initial_memory: Some(64 * 1024 * 1024),
                    allow_memory_growth: true,
                    modularize: true,
                    webgl: Some(2),
                    export_name: Some("createModule".to_string()),
                    exported_runtime_methods: strings(&["cwrap", "ccall", "allocateUTF8"]),
                    exceptions: Some(false),
                    rtti: Some(false),
                    ..Features::default()
                },
                profiles,
                patches: vec![],
            }
        }
    }
}

pub fn render_preset(preset: &Preset) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(&preset_config(preset))?)
}
