use crate::domain::models::{CheckItem, DoctorReport, Overrides};
use crate::services::compiler::program_available;
use crate::services::config::{load_project, ConfigError};
use crate::services::discovery::discover_sources;
use std::path::Path;

fn item(name: &str, status: &str) -> CheckItem {
    CheckItem {
        name: name.to_string(),
        status: status.to_string(),
    }
}

pub fn doctor(config_path: &Path, overrides: &Overrides) -> DoctorReport {
    let mut checks = vec![item(
        "emsdk_env",
        if std::env::var_os("EMSDK").is_some() {
            "ok"
        } else {
            "not_set"
        },
    )];

    let project = match load_project(config_path) {
        Ok(p) => {
            checks.push(item("config", "ok"));
            p
        }
        Err(e) => {
            log::warn!("{:#}", e);
            let status = if matches!(
                e.downcast_ref::<ConfigError>(),
                Some(ConfigError::NotFound(_))
            ) {
                "missing"
            } else {
                "invalid"
            };
            checks.push(item("config", status));
            return finish(checks);
        }
    };

    let root = project.source_root();
    checks.push(item(
        "source_root",
        if root.is_dir() { "ok" } else { "missing" },
    ));
    if root.is_dir() {
        let status = match discover_sources(
            &root,
            &project.config.extensions,
            &project.config.exclude_prefixes,
        ) {
            Ok(s) if !s.is_empty() => "ok",
            Ok(_) => "empty",
            Err(_) => "error",
        };
        checks.push(item("sources", status));
    }

    let compiler_status = match project.compiler_program(overrides) {
        Ok(program) if program_available(&program) => "ok",
        Ok(_) => "missing",
        Err(ConfigError::MissingEnv(_)) => "missing_env",
        Err(_) => "invalid",
    };
    checks.push(item("compiler", compiler_status));

    let output_dir_status = match project.output_path().parent() {
        Some(dir) if dir.is_dir() => "ok",
        _ => "will_create",
    };
    checks.push(item("output_dir", output_dir_status));

    finish(checks)
}

fn finish(checks: Vec<CheckItem>) -> DoctorReport {
    let overall = if checks
        .iter()
        .all(|c| matches!(c.status.as_str(), "ok" | "not_set" | "will_create"))
    {
        "ok"
    } else {
        "needs_attention"
    }
    .to_string();
    DoctorReport { overall, checks }
}
