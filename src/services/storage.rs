use crate::domain::constants::STATE_VERSION;
use crate::domain::models::{BuildRecord, State};
use crate::services::config::Project;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// One line of `~/.config/emkit/audit.jsonl`.
#[derive(Serialize)]
struct AuditEvent<'a> {
    ts: u64,
    action: &'a str,
    data: serde_json::Value,
}

/// Best effort: an unwritable audit log never fails the command.
pub fn audit(action: &str, data: serde_json::Value) {
    let Ok(home) = std::env::var("HOME") else {
        log::debug!("HOME not set, skipping audit of {}", action);
        return;
    };
    let dir = PathBuf::from(home).join(".config/emkit");
    let event = AuditEvent {
        ts: unix_now(),
        action,
        data,
    };
    let written = serde_json::to_string(&event)
        .map_err(std::io::Error::from)
        .and_then(|line| {
            std::fs::create_dir_all(&dir)?;
            let mut f = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("audit.jsonl"))?;
            writeln!(f, "{}", line)
        });
    if let Err(e) = written {
        log::warn!("could not append audit event {}: {}", action, e);
    }
}

pub fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn state_path(project: &Project) -> PathBuf {
    project.state_dir().join("state.json")
}

pub fn load_state(project: &Project) -> anyhow::Result<State> {
    let p = state_path(project);
    if !p.exists() {
        return Ok(State {
            version: STATE_VERSION,
            ..State::default()
        });
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_state(project: &Project, s: &State) -> anyhow::Result<()> {
    let p = state_path(project);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

pub fn record_build(project: &Project, record: BuildRecord) -> anyhow::Result<()> {
    let mut state = load_state(project)?;
    state.version = STATE_VERSION;
    state.builds.insert(record.profile.clone(), record);
    save_state(project, &state)
}

/// Drops the build record; returns how many profiles it described.
pub fn clear_state(project: &Project) -> anyhow::Result<usize> {
    let p = state_path(project);
    if !p.exists() {
        return Ok(0);
    }
    let count = load_state(project).map(|s| s.builds.len()).unwrap_or(0);
    std::fs::remove_file(p)?;
    Ok(count)
}
