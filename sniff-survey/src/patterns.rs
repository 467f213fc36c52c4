//! File pattern matching against a project tree.
//!
//! Catalog patterns come in four shapes, all relative to the project root:
//!
//! - `Gemfile` - a literal path that must exist
//! - `*.tf` - a glob with wildcards
//! - `requirements/*.txt` - a glob with subdirectory segments
//! - `.github/workflows/` - a trailing slash: the directory must exist
//!
//! Patterns are trusted static data, so malformed globs are logged and treated
//! as matching nothing rather than failing the scan.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Characters that make a pattern a glob rather than a literal path.
const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

/// Returns true if `pattern` matches at least one path under `root`.
pub fn has_match(root: &Path, pattern: &str) -> bool {
    if let Some(dir) = pattern.strip_suffix('/') {
        return root.join(dir).is_dir();
    }

    if is_glob(pattern) {
        return glob_paths(root, pattern).next().is_some();
    }

    root.join(pattern).exists()
}

/// Returns true if any of `patterns` matches under `root`.
pub fn any_match<'a, I>(root: &Path, patterns: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    patterns.into_iter().any(|pattern| has_match(root, pattern))
}

/// Regular files under `root` matching `pattern`.
///
/// Directory patterns never yield files.
pub fn matching_files(root: &Path, pattern: &str) -> BTreeSet<PathBuf> {
    if pattern.ends_with('/') {
        return BTreeSet::new();
    }

    if is_glob(pattern) {
        return glob_paths(root, pattern).filter(|p| p.is_file()).collect();
    }

    let path = root.join(pattern);
    if path.is_file() {
        BTreeSet::from([path])
    } else {
        BTreeSet::new()
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains('/') || pattern.contains(GLOB_METACHARACTERS)
}

/// Expands `pattern` below `root`, skipping entries that cannot be read.
///
/// The root itself is escaped so that a project living in a directory whose
/// name contains glob metacharacters is still matched literally.
fn glob_paths(root: &Path, pattern: &str) -> impl Iterator<Item = PathBuf> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);

    let paths = match glob::glob(&full_pattern) {
        Ok(paths) => Some(paths),
        Err(e) => {
            tracing::debug!("Ignoring invalid pattern {}: {}", pattern, e);
            None
        }
    };

    paths.into_iter().flatten().filter_map(|entry| match entry {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!("Failed to read glob entry: {}", e);
            None
        }
    })
}
