//! Runtime settings for `stacksniff sniff`.
//!
//! Settings come from command-line flags, then environment variables, then
//! defaults:
//!
//! - `STACKSNIFF_CATALOG_DIR`: directory holding `languages.yml`,
//!   `services.yml` and `technologies.yml` to use instead of the bundled catalog
//! - `STACKSNIFF_OUTPUT_FILE`: stack file to write instead of
//!   `<project>/stacksniff.yml`
//!
//! A leading `~` in any path is expanded to the home directory.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CATALOG_DIR_ENV: &str = "STACKSNIFF_CATALOG_DIR";
pub const OUTPUT_FILE_ENV: &str = "STACKSNIFF_OUTPUT_FILE";

/// Stack file written into the project root by default.
pub const DEFAULT_STACK_FILE: &str = "stacksniff.yml";

/// Errors that can occur while resolving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The project path is missing or not a directory.
    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    /// The catalog override is missing or not a directory.
    #[error("Catalog directory not found: {}", .0.display())]
    CatalogDirNotFound(PathBuf),

    /// A path used `~` but the home directory is unknown.
    #[error("Cannot determine home directory to expand {0}")]
    NoHomeDir(String),

    /// The project path could not be made absolute.
    #[error("Failed to resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fully resolved settings for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffSettings {
    /// Canonical project directory.
    pub project_root: PathBuf,

    /// Catalog override; `None` uses the bundled catalog.
    pub catalog_dir: Option<PathBuf>,

    /// Stack file to merge results into.
    pub output_file: PathBuf,

    /// Whether to write the stack file at all.
    pub write: bool,

    /// Print the JSON report instead of console lines.
    pub json: bool,
}

impl SniffSettings {
    /// Resolves settings from flags and the process environment.
    pub fn resolve(
        path: Option<&str>,
        catalog: Option<&str>,
        output: Option<&str>,
    ) -> Result<Self, SettingsError> {
        Self::resolve_with_env(path, catalog, output, |name| env::var(name).ok())
    }

    /// Resolves settings with a custom environment lookup.
    pub fn resolve_with_env<F>(
        path: Option<&str>,
        catalog: Option<&str>,
        output: Option<&str>,
        lookup: F,
    ) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project = expand_home(path.unwrap_or("."))?;
        if !project.is_dir() {
            return Err(SettingsError::ProjectNotFound(project));
        }
        let project_root = project
            .canonicalize()
            .map_err(|source| SettingsError::Resolve {
                path: project.clone(),
                source,
            })?;

        let catalog_dir = match catalog.map(str::to_string).or_else(|| lookup(CATALOG_DIR_ENV)) {
            Some(dir) => Some(expand_home(&dir)?),
            None => None,
        };

        let output_file = match output.map(str::to_string).or_else(|| lookup(OUTPUT_FILE_ENV)) {
            Some(file) => expand_home(&file)?,
            None => project_root.join(DEFAULT_STACK_FILE),
        };

        let settings = Self {
            project_root,
            catalog_dir,
            output_file,
            write: true,
            json: false,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// The project name used as the stack file section.
    pub fn project_name(&self) -> String {
        project_name(&self.project_root)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if let Some(dir) = &self.catalog_dir {
            if !dir.is_dir() {
                return Err(SettingsError::CatalogDirNotFound(dir.clone()));
            }
        }
        Ok(())
    }
}

/// Base name of `root`, or "project" for a filesystem root.
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, SettingsError> {
    let rest = match path {
        "~" => "",
        _ => match path.strip_prefix("~/") {
            Some(rest) => rest,
            None => return Ok(PathBuf::from(path)),
        },
    };

    let home = dirs::home_dir().ok_or_else(|| SettingsError::NoHomeDir(path.to_string()))?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}
