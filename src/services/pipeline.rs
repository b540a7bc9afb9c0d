use crate::domain::models::{BuildRecord, BuildReport, CompilerCommand, LoaderPatch, Overrides};
use crate::services::compiler::{self, BuildError};
use crate::services::config::Project;
use crate::services::discovery::discover_sources;
use crate::services::fingerprint;
use crate::services::flags::assemble_args;
use crate::services::patch::apply_patches;
use crate::services::storage::{audit, load_state, record_build, unix_now};

#[derive(Debug, Default)]
pub struct BuildRequest {
    pub profile: Option<String>,
    pub dry_run: bool,
    pub no_patch: bool,
    pub if_changed: bool,
    pub overrides: Overrides,
}

pub struct Plan {
    pub profile: String,
    pub sources: Vec<String>,
    pub command: CompilerCommand,
}

pub fn plan(project: &Project, profile: Option<&str>, overrides: &Overrides) -> anyhow::Result<Plan> {
    let (name, profile) = project.profile(profile)?;
    let root = project.source_root();
    let sources = discover_sources(
        &root,
        &project.config.extensions,
        &project.config.exclude_prefixes,
    )?;
    let command = CompilerCommand {
        program: project.compiler_program(overrides)?,
        args: assemble_args(&project.config, &profile, &sources, overrides),
        cwd: root.to_string_lossy().to_string(),
    };
    Ok(Plan {
        profile: name,
        sources,
        command,
    })
}

/// Records a failed build. A state write error is logged so the build error
/// stays the one reported.
fn record_failure(project: &Project, mut record: BuildRecord, error: &str) {
    record.finished_at = unix_now();
    let profile = record.profile.clone();
    if let Err(e) = record_build(project, record) {
        log::error!("could not save build record for {}: {:#}", profile, e);
    }
    audit(
        "build",
        serde_json::json!({"profile": profile, "status": "failed", "error": error}),
    );
}

fn report(plan: Plan, status: &str, fingerprint: String, output: String) -> BuildReport {
    BuildReport {
        profile: plan.profile,
        status: status.to_string(),
        fingerprint,
        output,
        source_count: plan.sources.len(),
        command: plan.command,
        exit_code: None,
        patches: vec![],
    }
}

/// Discover, assemble, compile once, then patch the loader.
///
/// Failed builds are recorded before the error is returned, and patches never
/// run against the output of a failed compile.
pub fn run_build(project: &Project, req: &BuildRequest) -> anyhow::Result<BuildReport> {
    let plan = plan(project, req.profile.as_deref(), &req.overrides)?;
    let root = project.source_root();
    if plan.sources.is_empty() {
        return Err(BuildError::NoSources(root.display().to_string()).into());
    }
    let patch_set: &[LoaderPatch] = if req.no_patch {
        &[]
    } else {
        project.config.patches.as_slice()
    };
    let fingerprint = fingerprint::compute(&root, &plan.sources, &plan.command, patch_set)?;
    let output = project.output_path();
    let output_display = output.display().to_string();

    if req.dry_run {
        return Ok(report(plan, "planned", fingerprint, output_display));
    }

    if req.if_changed {
        let state = load_state(project)?;
        let unchanged = state.builds.get(&plan.profile).is_some_and(|r| {
            r.status == "ok" && r.fingerprint == fingerprint && output.exists()
        });
        if unchanged {
            log::info!("profile {} is up to date", plan.profile);
            return Ok(report(plan, "up_to_date", fingerprint, output_display));
        }
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    log::info!(
        "compiling {} sources with profile {}",
        plan.sources.len(),
        plan.profile
    );
    let mut record = BuildRecord {
        profile: plan.profile.clone(),
        fingerprint: fingerprint.clone(),
        output: output_display.clone(),
        status: "failed".to_string(),
        exit_code: None,
        source_count: plan.sources.len(),
        finished_at: 0,
    };

    let exit_code = match compiler::run(&plan.command) {
        Ok(code) => code,
        Err(e) => {
            record.exit_code = e.exit_code();
            record_failure(project, record, &e.to_string());
            return Err(e.into());
        }
    };
    record.exit_code = Some(exit_code);

    let patches = if req.no_patch {
        vec![]
    } else {
        match apply_patches(project, None) {
            Ok(p) => p,
            Err(e) => {
                record_failure(project, record, &format!("{:#}", e));
                return Err(e);
            }
        }
    };

    record.status = "ok".to_string();
    record.finished_at = unix_now();
    record_build(project, record)?;
    audit(
        "build",
        serde_json::json!({
            "profile": plan.profile,
            "status": "ok",
            "sources": plan.sources.len(),
            "fingerprint": fingerprint,
        }),
    );

    let mut out = report(plan, "built", fingerprint, output_display);
    out.exit_code = Some(exit_code);
    out.patches = patches;
    Ok(out)
}
