use crate::domain::models::{LoaderPatch, PatchReport};
use crate::services::config::Project;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("cannot read patch target {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pattern not found in {file}: {find}")]
    NotFound { file: String, find: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied(usize),
    AlreadyApplied,
    NotFound,
}

impl PatchOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            PatchOutcome::Applied(_) => "applied",
            PatchOutcome::AlreadyApplied => "already_applied",
            PatchOutcome::NotFound => "not_found",
        }
    }

    pub fn replacements(&self) -> usize {
        match self {
            PatchOutcome::Applied(n) => *n,
            _ => 0,
        }
    }
}

/// Replaces every occurrence of `find`. When `find` is gone but `replace` is
/// already there, the text was patched by an earlier run.
pub fn apply_to_text(text: &str, find: &str, replace: &str) -> (String, PatchOutcome) {
    let count = text.matches(find).count();
    if count > 0 {
        return (text.replace(find, replace), PatchOutcome::Applied(count));
    }
    if !replace.is_empty() && text.contains(replace) {
        return (text.to_string(), PatchOutcome::AlreadyApplied);
    }
    (text.to_string(), PatchOutcome::NotFound)
}

fn patch_target(project: &Project, patch: &LoaderPatch) -> PathBuf {
    match &patch.file {
        Some(f) => project.source_root().join(f),
        None => project.output_path(),
    }
}

fn patch_file(path: &Path, patches: &[&LoaderPatch]) -> anyhow::Result<Vec<PatchReport>> {
    let display = path.display().to_string();
    let original = std::fs::read_to_string(path).map_err(|source| PatchError::Read {
        path: display.clone(),
        source,
    })?;
    let mut text = original.clone();
    let mut reports = Vec::new();
    for p in patches {
        let (next, outcome) = apply_to_text(&text, &p.find, &p.replace);
        if outcome == PatchOutcome::NotFound && p.required {
            return Err(PatchError::NotFound {
                file: display,
                find: p.find.clone(),
            }
            .into());
        }
        log::info!("patch {}: {}", display, outcome.status());
        reports.push(PatchReport {
            file: display.clone(),
            status: outcome.status().to_string(),
            replacements: outcome.replacements(),
        });
        text = next;
    }
    if text != original {
        std::fs::write(path, text)?;
    }
    Ok(reports)
}

/// Applies the configured patches, grouped per target file so each file is
/// read and written once. `only` redirects every patch to a single file.
pub fn apply_patches(project: &Project, only: Option<&Path>) -> anyhow::Result<Vec<PatchReport>> {
    let mut by_file: BTreeMap<PathBuf, Vec<&LoaderPatch>> = BTreeMap::new();
    for p in &project.config.patches {
        let target = match only {
            Some(f) => f.to_path_buf(),
            None => patch_target(project, p),
        };
        by_file.entry(target).or_default().push(p);
    }
    let mut reports = Vec::new();
    for (path, patches) in by_file {
        reports.extend(patch_file(&path, &patches)?);
    }
    Ok(reports)
}
