//! Language presence detection.
//!
//! A language is present when any file pattern of any of its package managers
//! matches under the project root. Absence is a valid outcome, not an error:
//! a project with no recognized manifest simply yields an empty set.
//!
//! # Example
//!
//! ```ignore
//! use sniff_catalog::Catalog;
//! use sniff_survey::detection::detect_languages;
//!
//! let catalog = Catalog::bundled()?;
//! let languages = detect_languages(Path::new("."), &catalog);
//! for language in &languages {
//!     println!("found {}", language);
//! }
//! ```

use crate::patterns;
use sniff_catalog::{Catalog, Language};
use std::collections::BTreeSet;
use std::path::Path;

/// Detects which catalog languages are present under `project_root`.
///
/// Returns language ids in alphabetical order.
pub fn detect_languages(project_root: &Path, catalog: &Catalog) -> BTreeSet<String> {
    catalog
        .languages()
        .iter()
        .filter(|(id, language)| {
            let present = is_language_present(project_root, language);
            if present {
                tracing::debug!("Language {} present in {}", id, project_root.display());
            }
            present
        })
        .map(|(id, _)| id.clone())
        .collect()
}

/// Returns true if any package manager of `language` has a matching file.
///
/// Patterns shared by several package managers are probed once.
pub fn is_language_present(project_root: &Path, language: &Language) -> bool {
    patterns::any_match(project_root, language.all_patterns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sniff_catalog::PackageManager;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn test_catalog() -> Catalog {
        let mut languages = BTreeMap::new();
        languages.insert(
            "ruby".to_string(),
            Language::default()
                .with_package_manager("bundler", PackageManager::new(["Gemfile", "*.gemspec"])),
        );
        languages.insert(
            "nodejs".to_string(),
            Language::default()
                .with_package_manager("npm", PackageManager::new(["package.json"]))
                .with_package_manager("yarn", PackageManager::new(["yarn.lock"])),
        );
        languages.insert(
            "python".to_string(),
            Language::default()
                .with_package_manager("pip", PackageManager::new(["requirements/*.txt"])),
        );
        Catalog::new(languages, BTreeMap::new(), BTreeMap::new()).unwrap()
    }

    fn create_test_repo(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full_path = temp_dir.path().join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full_path, content).unwrap();
        }
        temp_dir
    }

    fn detected(repo: &TempDir) -> Vec<String> {
        detect_languages(repo.path(), &test_catalog())
            .into_iter()
            .collect()
    }

    #[test]
    fn test_ruby_project() {
        let repo = create_test_repo(&[("Gemfile", "gem 'rails'")]);
        assert_eq!(detected(&repo), vec!["ruby"]);
    }

    #[test]
    fn test_nodejs_project() {
        let repo = create_test_repo(&[("package.json", r#"{"name": "test"}"#)]);
        assert_eq!(detected(&repo), vec!["nodejs"]);
    }

    #[test]
    fn test_language_found_through_secondary_package_manager() {
        let repo = create_test_repo(&[("yarn.lock", "")]);
        assert_eq!(detected(&repo), vec!["nodejs"]);
    }

    #[test]
    fn test_wildcard_and_subdirectory_patterns() {
        let repo = create_test_repo(&[("mylib.gemspec", ""), ("requirements/base.txt", "flask")]);
        assert_eq!(detected(&repo), vec!["python", "ruby"]);
    }

    #[test]
    fn test_multi_language_project() {
        let repo = create_test_repo(&[
            ("Gemfile", "gem 'rails'"),
            ("package.json", r#"{"name": "test"}"#),
        ]);
        assert_eq!(detected(&repo), vec!["nodejs", "ruby"]);
    }

    #[test]
    fn test_no_recognized_files() {
        let repo = create_test_repo(&[("README.md", "# Test")]);
        assert!(detected(&repo).is_empty());
    }

    #[test]
    fn test_missing_root_is_empty_not_error() {
        let languages = detect_languages(Path::new("/nonexistent/stacksniff/root"), &test_catalog());
        assert!(languages.is_empty());
    }
}
