//! Reading and writing the stack file.
//!
//! The stack file maps project names to sections of display-name/value
//! pairs:
//!
//! ```yaml
//! shop:
//!   Repository: https://github.com/org/shop
//!   Stripe: https://dashboard.stripe.com
//!   GitHub Actions: https://github.com/org/shop/actions
//! other-project:
//!   Hosting: https://carrd.com
//! ```
//!
//! Writing merges into an existing file. Other projects' sections are left
//! alone, keys already in this project's section are kept unless detected
//! again, and detected keys are inserted or overwritten.

use serde_yaml::{Mapping, Value};
use sniff_catalog::Catalog;
use sniff_survey::DetectionResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing a stack file.
#[derive(Debug, Error)]
pub enum StackFileError {
    #[error("Failed to read stack file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write stack file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Stack file {} is not valid YAML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed, but not as project sections of key/value pairs.
    #[error("Stack file {} has an unexpected layout: {reason}", path.display())]
    Layout { path: PathBuf, reason: String },

    #[error("Failed to render stack file: {0}")]
    Render(#[from] serde_yaml::Error),
}

/// What a write changed in the project's section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// The file did not exist before.
    pub created: bool,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Builds the section for `results`, keyed by display name, in key order.
pub fn render_section(results: &DetectionResult, catalog: &Catalog) -> Mapping {
    results
        .iter()
        .map(|(key, value)| {
            (
                Value::String(catalog.display_name(key)),
                Value::String(value.clone()),
            )
        })
        .collect()
}

/// Merges `results` into `document` under `project`.
pub fn merge_section(
    document: &mut Mapping,
    project: &str,
    results: &DetectionResult,
    catalog: &Catalog,
) -> Result<WriteSummary, String> {
    let section = document
        .entry(Value::String(project.to_string()))
        .or_insert_with(|| Value::Mapping(Mapping::new()));

    if section.is_null() {
        *section = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(section) = section else {
        return Err(format!("section '{}' is not a mapping", project));
    };

    let mut summary = WriteSummary::default();
    for (name, value) in render_section(results, catalog) {
        match section.insert(name, value.clone()) {
            None => summary.added += 1,
            Some(previous) if previous == value => summary.unchanged += 1,
            Some(_) => summary.updated += 1,
        }
    }
    Ok(summary)
}

/// Merges `results` into the stack file at `path`, creating it if needed.
pub fn write(
    path: &Path,
    project: &str,
    results: &DetectionResult,
    catalog: &Catalog,
) -> Result<WriteSummary, StackFileError> {
    let existing = load_document(path)?;
    let created = existing.is_none();
    let mut document = existing.unwrap_or_default();

    let mut summary = merge_section(&mut document, project, results, catalog).map_err(|reason| {
        StackFileError::Layout {
            path: path.to_path_buf(),
            reason,
        }
    })?;
    summary.created = created;

    let content = serde_yaml::to_string(&document)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StackFileError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, content).map_err(|source| StackFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Wrote {} ({} added, {} updated, {} unchanged)",
        path.display(),
        summary.added,
        summary.updated,
        summary.unchanged
    );
    Ok(summary)
}

/// Reads `project`'s section back as result keys and values.
///
/// Returns `None` when the file or the section does not exist.
pub fn read_section(
    path: &Path,
    project: &str,
    catalog: &Catalog,
) -> Result<Option<DetectionResult>, StackFileError> {
    let Some(document) = load_document(path)? else {
        return Ok(None);
    };
    let Some(section) = document.get(project) else {
        return Ok(None);
    };
    let Some(section) = section.as_mapping() else {
        return Err(StackFileError::Layout {
            path: path.to_path_buf(),
            reason: format!("section '{}' is not a mapping", project),
        });
    };

    let mut results = DetectionResult::new();
    for (name, value) in section {
        let (Some(name), Some(value)) = (name.as_str(), scalar_to_string(value)) else {
            tracing::debug!("Skipping non-scalar entry in {}: {:?}", project, name);
            continue;
        };
        results.insert(catalog.key_for_display_name(name), value);
    }
    Ok(Some(results))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses the stack file; `None` when it does not exist.
fn load_document(path: &Path) -> Result<Option<Mapping>, StackFileError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StackFileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value: Value = serde_yaml::from_str(&content).map_err(|source| StackFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Null => Ok(Some(Mapping::new())),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        _ => Err(StackFileError::Layout {
            path: path.to_path_buf(),
            reason: "top level must map project names to sections".to_string(),
        }),
    }
}
