use crate::domain::models::CompilerCommand;
use std::process::{Command, Stdio};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("no sources found under {0}")]
    NoSources(String),
    #[error("failed to start compiler `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler exited with {}", describe_code(.code))]
    Failed { code: Option<i32> },
}

impl BuildError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::Failed { code } => *code,
            _ => None,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Runs the compiler once in its working directory. The child's stdout is
/// sent to our stderr so `--json` output stays parseable.
pub fn run(command: &CompilerCommand) -> Result<i32, BuildError> {
    log::info!("running {} in {}", command.program, command.cwd);
    log::debug!("{}", command.display_line());
    let status = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .stdout(Stdio::from(std::io::stderr()))
        .status()
        .map_err(|source| BuildError::Spawn {
            program: command.program.clone(),
            source,
        })?;
    if status.success() {
        Ok(status.code().unwrap_or(0))
    } else {
        Err(BuildError::Failed {
            code: status.code(),
        })
    }
}

/// True when `program` names an existing file, or a bare name found on `PATH`.
pub fn program_available(program: &str) -> bool {
    if program.contains('/') || program.contains('\\') {
        return std::path::Path::new(program).is_file();
    }
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("bat").is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let cmd = CompilerCommand {
            program: "/nonexistent/emkit-test/emcc".to_string(),
            args: vec![],
            cwd: ".".to_string(),
        };
        let err = run(&cmd).unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn failed_message_names_the_status() {
        let err = BuildError::Failed { code: Some(2) };
        assert_eq!(err.to_string(), "compiler exited with status 2");
    }

    #[test]
    fn absent_absolute_program_is_unavailable() {
        assert!(!program_available("/nonexistent/emkit-test/emcc"));
    }
}
