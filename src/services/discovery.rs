use anyhow::Context;
use std::path::Path;
use walkdir::WalkDir;

fn to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Literal string prefix on the `/`-separated relative path, so `debug`
/// matches both `debug/main.cpp` and `debugger.cpp`.
pub fn is_excluded(rel: &str, exclude_prefixes: &[String]) -> bool {
    exclude_prefixes
        .iter()
        .any(|p| !p.is_empty() && rel.starts_with(p.as_str()))
}

/// Lists source files under `root`, relative to it, grouped by extension in
/// the order given and sorted within each group.
pub fn discover_sources(
    root: &Path,
    extensions: &[String],
    exclude_prefixes: &[String],
) -> anyhow::Result<Vec<String>> {
    if !root.is_dir() {
        anyhow::bail!("source root is not a directory: {}", root.display());
    }
    let mut groups: Vec<Vec<String>> = vec![Vec::new(); extensions.len()];
    // Pruning a directory is safe: its descendants share the excluded prefix.
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || e.path()
                .strip_prefix(root)
                .map(|rel| !is_excluded(&to_slash(rel), exclude_prefixes))
                .unwrap_or(true)
    });
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        // Symlinked files count by their target; symlinked directories are not walked.
        if !entry.path().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(idx) = extensions.iter().position(|e| e == ext) else {
            continue;
        };
        let rel = entry.path().strip_prefix(root)?;
        groups[idx].push(to_slash(rel));
    }
    for g in &mut groups {
        g.sort();
    }
    let sources: Vec<String> = groups.into_iter().flatten().collect();
    log::debug!("discovered {} sources under {}", sources.len(), root.display());
    Ok(sources)
}
