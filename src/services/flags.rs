use crate::domain::models::{Features, Overrides, Profile, ProjectConfig};

fn setting(name: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("-s{}={}", name, v),
        None => format!("-s{}", name),
    }
}

fn raw_setting(s: &str) -> String {
    let s = s.trim();
    let s = s.strip_prefix("-s").unwrap_or(s).trim_start();
    format!("-s{}", s)
}

fn feature_settings(f: &Features) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(size) = &f.pthread_pool_size {
        out.push(setting("PTHREAD_POOL_SIZE", Some(size.as_str())));
    }
    if let Some(bytes) = f.initial_memory {
        out.push(setting("INITIAL_MEMORY", Some(bytes.to_string().as_str())));
    }
    if let Some(bytes) = f.maximum_memory {
        out.push(setting("MAXIMUM_MEMORY", Some(bytes.to_string().as_str())));
    }
    if f.allow_memory_growth {
        out.push(setting("ALLOW_MEMORY_GROWTH", None));
    }
    if let Some(v) = f.webgl {
        let v = v.to_string();
        out.push(setting("MIN_WEBGL_VERSION", Some(v.as_str())));
        out.push(setting("MAX_WEBGL_VERSION", Some(v.as_str())));
        if v == "2" {
            out.push(setting("USE_WEBGL2", None));
        }
    }
    if f.full_es3 {
        out.push(setting("FULL_ES3", None));
    }
    if f.modularize {
        out.push(setting("MODULARIZE", Some("1")));
    }
    if f.export_es6 {
        out.push(setting("EXPORT_ES6", None));
    }
    if let Some(name) = &f.export_name {
        out.push(setting("EXPORT_NAME", Some(name.as_str())));
    }
    if !f.exported_functions.is_empty() {
        out.push(setting(
            "EXPORTED_FUNCTIONS",
            Some(f.exported_functions.join(",").as_str()),
        ));
    }
    if !f.exported_runtime_methods.is_empty() {
        out.push(setting(
            "EXPORTED_RUNTIME_METHODS",
            Some(f.exported_runtime_methods.join(",").as_str()),
        ));
    }
    out
}

fn codegen_flags(rtti: Option<bool>, exceptions: Option<bool>) -> Vec<String> {
    let mut out = Vec::new();
    if rtti == Some(false) {
        out.push("-fno-rtti".to_string());
    }
    match exceptions {
        Some(false) => out.push("-fno-exceptions".to_string()),
        Some(true) => out.push(setting("NO_DISABLE_EXCEPTION_CATCHING", Some("1"))),
        None => {}
    }
    out
}

/// Builds the compiler argument vector: pre-source flags, sources, output,
/// libraries, defines, threading, standard, settings, code generation,
/// extra flags, then the profile's own additions.
pub fn assemble_args(
    config: &ProjectConfig,
    profile: &Profile,
    sources: &[String],
    overrides: &Overrides,
) -> Vec<String> {
    let f = &config.features;
    let mut args = Vec::new();

    if f.simd {
        args.push("-msimd128".to_string());
    }
    args.extend(config.pre_source_flags.iter().cloned());

    args.extend(sources.iter().cloned());
    args.push("-o".to_string());
    args.push(config.output.to_string_lossy().to_string());

    args.extend(config.libraries.iter().map(|l| format!("-l{}", l)));
    args.extend(
        config
            .defines
            .iter()
            .chain(overrides.defines.iter())
            .map(|d| format!("-D{}", d)),
    );
    if f.threads {
        args.push("-pthread".to_string());
    }
    if let Some(std) = &config.std {
        args.push(format!("-std={}", std));
    }

    args.extend(feature_settings(f));
    args.extend(config.settings.iter().map(|s| raw_setting(s)));

    args.extend(codegen_flags(
        profile.rtti.or(f.rtti),
        profile.exceptions.or(f.exceptions),
    ));
    args.extend(config.flags.iter().cloned());
    args.extend(overrides.flags.iter().cloned());

    args.extend(profile.defines.iter().map(|d| format!("-D{}", d)));
    if let Some(level) = &profile.opt_level {
        args.push(format!("-O{}", level));
    }
    if profile.debug_info {
        args.push("-g".to_string());
    }
    if profile.assertions {
        args.push(setting("ASSERTIONS", Some("1")));
    }
    if profile.fast_math {
        args.push("-funsafe-math-optimizations".to_string());
    }
    args.extend(profile.settings.iter().map(|s| raw_setting(s)));
    args.extend(profile.flags.iter().cloned());
    args
}
