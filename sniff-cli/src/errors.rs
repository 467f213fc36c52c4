use sniff_catalog::CatalogError;
use thiserror::Error;

use crate::commands::InitError;
use crate::settings::{CATALOG_DIR_ENV, SettingsError};
use crate::stack_file::StackFileError;

/// Every error a command can end with.
#[derive(Debug, Error)]
pub enum SniffError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    StackFile(#[from] StackFileError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error("Failed to render JSON report: {0}")]
    Report(#[from] serde_json::Error),
}

impl SniffError {
    /// Get a suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            SniffError::Settings(SettingsError::ProjectNotFound(_)) => {
                Some("Pass an existing project directory with --path".to_string())
            }
            SniffError::Settings(SettingsError::CatalogDirNotFound(_)) => Some(format!(
                "Check --catalog or the {} environment variable",
                CATALOG_DIR_ENV
            )),
            SniffError::Settings(SettingsError::NoHomeDir(_)) => {
                Some("Use an absolute path instead of one starting with ~".to_string())
            }
            SniffError::Settings(SettingsError::Resolve { .. }) => None,
            SniffError::Catalog(_) => Some(
                "The catalog directory must contain valid languages.yml, services.yml and technologies.yml files"
                    .to_string(),
            ),
            SniffError::StackFile(StackFileError::Parse { .. } | StackFileError::Layout { .. }) => {
                Some("Fix or remove the stack file, or run with --no-write".to_string())
            }
            SniffError::StackFile(_) => {
                Some("Check file permissions, or choose another file with --output".to_string())
            }
            SniffError::Init(InitError::FileExists { .. }) => {
                Some("Use --force to overwrite it, or --output to pick another file".to_string())
            }
            SniffError::Init(InitError::WriteError(_)) | SniffError::Report(_) => None,
        }
    }

    /// Format error with suggestion for CLI output
    pub fn format_for_cli(&self) -> String {
        let mut output = format!("Error: {}", self);

        if let Some(suggestion) = self.suggestion() {
            output.push_str(&format!("\n\nSuggestion: {}", suggestion));
        }

        output
    }
}
