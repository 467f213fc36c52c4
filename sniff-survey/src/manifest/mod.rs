//! Manifest scanning.
//!
//! For a detected language, the scanner collects every file matching any of
//! that language's package-manager patterns, analyzes each file once, and
//! reports which catalog package names it declares.
//!
//! # Resilience
//!
//! A manifest that cannot be read yields no findings. One bad file never
//! aborts the scan of the others.

mod format;

pub use format::ManifestFormat;

use crate::patterns;
use sniff_catalog::Catalog;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A package name found in a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManifestFinding {
    /// Language id the manifest belongs to (e.g. "ruby").
    pub language: String,

    /// The manifest the package was declared in.
    pub file_path: PathBuf,

    /// The declared package name, exactly as listed in the catalog.
    pub package_name: String,
}

/// Manifest files of `language`, grouped by package manager.
///
/// Files matched by several patterns appear once per package manager.
/// Package managers without any matching file are omitted, as is every
/// package manager of a language missing from the catalog.
pub fn scan_by_package_manager(
    project_root: &Path,
    language: &str,
    catalog: &Catalog,
) -> BTreeMap<String, BTreeSet<PathBuf>> {
    let Some(lang) = catalog.language(language) else {
        return BTreeMap::new();
    };

    lang.package_managers
        .iter()
        .filter_map(|(pm_id, pm)| {
            let files: BTreeSet<PathBuf> = pm
                .files
                .iter()
                .flat_map(|pattern| patterns::matching_files(project_root, pattern))
                .collect();
            (!files.is_empty()).then(|| (pm_id.clone(), files))
        })
        .collect()
}

/// Catalog packages declared by `path`.
///
/// The file is read and analyzed once for all candidates. Unreadable files
/// yield no packages.
pub fn declared_packages<'a, I>(path: &Path, candidates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Failed to read manifest {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    ManifestFormat::for_path(path).declared(&content, candidates)
}

/// Looks for the catalog's package vocabulary of `language` in `files`.
pub fn findings<'p, I>(language: &str, files: I, catalog: &Catalog) -> Vec<ManifestFinding>
where
    I: IntoIterator<Item = &'p Path>,
{
    let candidates = catalog.packages_for_language(language);
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    for file in files {
        for package in declared_packages(file, candidates.iter().copied()) {
            findings.push(ManifestFinding {
                language: language.to_string(),
                file_path: file.to_path_buf(),
                package_name: package.to_string(),
            });
        }
    }

    tracing::debug!("Found {} package declarations for {}", findings.len(), language);
    findings
}
