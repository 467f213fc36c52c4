//! A summary of the languages and package managers a project uses.
//!
//! The profile keeps the manifest files it found, so the services detector
//! can analyze them without globbing the project a second time.

use crate::detection::detect_languages;
use crate::manifest;
use serde::Serialize;
use sniff_catalog::Catalog;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Manifest files per package manager, per language.
pub type ManifestsByLanguage = BTreeMap<String, BTreeMap<String, BTreeSet<PathBuf>>>;

/// Detected languages and the manifests of each of their package managers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackProfile {
    languages: ManifestsByLanguage,
}

impl StackProfile {
    /// Surveys `project_root` for languages and gathers their manifests.
    pub fn survey(project_root: &Path, catalog: &Catalog) -> Self {
        let languages = detect_languages(project_root, catalog)
            .into_iter()
            .map(|language| {
                let manifests = manifest::scan_by_package_manager(project_root, &language, catalog);
                (language, manifests)
            })
            .collect();

        Self::from_manifests(languages)
    }

    /// Builds a profile from manifests that were already gathered.
    ///
    /// A language with no manifest file is still present.
    pub fn from_manifests(languages: ManifestsByLanguage) -> Self {
        Self { languages }
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Detected language ids, alphabetically.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Manifest files of `language`, deduplicated across package managers.
    pub fn manifests(&self, language: &str) -> BTreeSet<&Path> {
        self.languages
            .get(language)
            .into_iter()
            .flat_map(|pms| pms.values())
            .flatten()
            .map(PathBuf::as_path)
            .collect()
    }

    /// The language with the most manifests. Ties go to the alphabetically
    /// first language.
    pub fn primary_language(&self) -> Option<&str> {
        max_by_count(self.languages.iter().map(|(language, pms)| {
            (language.as_str(), pms.values().map(BTreeSet::len).sum::<usize>())
        }))
    }

    /// The package manager with the most manifests within the primary
    /// language, ties broken alphabetically.
    pub fn primary_package_manager(&self) -> Option<&str> {
        let language = self.primary_language()?;
        max_by_count(
            self.languages
                .get(language)?
                .iter()
                .map(|(pm, files)| (pm.as_str(), files.len())),
        )
    }
}

/// First entry with the strictly highest count, in iteration order.
fn max_by_count<'a>(entries: impl Iterator<Item = (&'a str, usize)>) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in entries {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name)
}
