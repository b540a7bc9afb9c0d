use crate::domain::models::{CompilerCommand, LoaderPatch};
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 over the compiler command, every source's path and bytes, and the
/// loader patches the build applies. A `--no-patch` build passes no patches.
pub fn compute(
    root: &Path,
    sources: &[String],
    command: &CompilerCommand,
    patches: &[LoaderPatch],
) -> anyhow::Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(command.program.as_bytes());
    for arg in &command.args {
        hasher.update([0u8]);
        hasher.update(arg.as_bytes());
    }
    for rel in sources {
        let bytes = std::fs::read(root.join(rel)).with_context(|| format!("reading {}", rel))?;
        hasher.update([1u8]);
        hasher.update(rel.as_bytes());
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    for p in patches {
        hasher.update([2u8]);
        hasher.update(p.find.as_bytes());
        hasher.update([0u8]);
        hasher.update(p.replace.as_bytes());
        hasher.update([u8::from(p.required)]);
        if let Some(file) = &p.file {
            hasher.update(file.to_string_lossy().as_bytes());
        }
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn command(args: &[&str]) -> CompilerCommand {
        CompilerCommand {
            program: "emcc".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: ".".to_string(),
        }
    }

    #[test]
    fn changes_with_sources_and_flags() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("main.cpp"), "int main(){}").unwrap();
        let sources = vec!["main.cpp".to_string()];

        let a = compute(tmp.path(), &sources, &command(&["-O3"]), &[]).unwrap();
        let again = compute(tmp.path(), &sources, &command(&["-O3"]), &[]).unwrap();
        assert_eq!(a, again);
        assert_eq!(a.len(), 64);

        let other_flags = compute(tmp.path(), &sources, &command(&["-O2"]), &[]).unwrap();
        assert_ne!(a, other_flags);

        std::fs::write(tmp.path().join("main.cpp"), "int main(){return 1;}").unwrap();
        let edited = compute(tmp.path(), &sources, &command(&["-O3"]), &[]).unwrap();
        assert_ne!(a, edited);
    }

    #[test]
    fn argument_boundaries_matter() {
        let tmp = TempDir::new().unwrap();
        let joined = compute(tmp.path(), &[], &command(&["-DA", "B"]), &[]).unwrap();
        let split = compute(tmp.path(), &[], &command(&["-DAB"]), &[]).unwrap();
        assert_ne!(joined, split);
    }

    #[test]
    fn patch_set_is_part_of_the_fingerprint() {
        let tmp = TempDir::new().unwrap();
        let patch = LoaderPatch {
            find: "a".to_string(),
            replace: "b".to_string(),
            required: true,
            file: None,
        };
        let cmd = command(&["-O3"]);
        let unpatched = compute(tmp.path(), &[], &cmd, &[]).unwrap();
        let patched = compute(tmp.path(), &[], &cmd, std::slice::from_ref(&patch)).unwrap();
        assert_ne!(unpatched, patched);

        let retargeted = LoaderPatch {
            file: Some("loader.js".into()),
            ..patch
        };
        let moved = compute(tmp.path(), &[], &cmd, &[retargeted]).unwrap();
        assert_ne!(patched, moved);
    }
}
