//! Implementation of the `stacksniff init` command.
//!
//! Writes an example stack file showing the free key/value format.
//!
//! # Usage
//!
//! ```bash
//! # Create stacksniff.yml in the current directory
//! stacksniff init
//!
//! # Specify output path
//! stacksniff init --output docs/stack.yml
//!
//! # Overwrite an existing file
//! stacksniff init --force
//! ```

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::output;
use crate::settings::DEFAULT_STACK_FILE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// Stack file already exists and --force was not specified.
    #[error("Stack file already exists: {path}. Use --force to overwrite.")]
    FileExists { path: String },

    /// Failed to write the stack file.
    #[error("Failed to write stack file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Example stack file written by `init`.
const EXAMPLE_STACK_FILE: &str = r#"# Describe your project with a free key-value format, think simple.
#
# Random sample:
registrar: gandi # registrar service
dns: Route 53 # dns service
hosting: https://carrd.com # hosting service
mail: zoho # mail service
"#;

/// Options for the `stacksniff init` command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output path for the stack file.
    pub output: Option<String>,
    /// Whether to overwrite an existing file.
    pub force: bool,
}

/// Run the `stacksniff init` command.
///
/// Returns an error if the file already exists (and `--force` was not
/// specified) or if writing failed.
pub fn run_init(options: InitOptions) -> Result<(), InitError> {
    let output_path = options
        .output
        .unwrap_or_else(|| DEFAULT_STACK_FILE.to_string());
    let path = Path::new(&output_path);

    if path.exists() && !options.force {
        return Err(InitError::FileExists { path: output_path });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, EXAMPLE_STACK_FILE)?;

    output::success(&format!("Created stack file: {}", output_path));
    output::info("Next steps:");
    output::info(&format!("  1. Edit {} to describe your project", output_path));
    output::info("  2. Run: stacksniff sniff to add detected services");

    Ok(())
}
