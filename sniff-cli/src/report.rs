//! JSON report for `stacksniff sniff --json`.
//!
//! ## Output Schema
//!
//! ```json
//! {
//!   "status": "ok",
//!   "generated_at": "2024-01-15T10:30:00Z",
//!   "project": "shop",
//!   "language": "ruby",
//!   "package_manager": "bundler",
//!   "languages": ["nodejs", "ruby"],
//!   "repo": "https://github.com/org/shop",
//!   "services": { "stripe": "https://dashboard.stripe.com" },
//!   "warnings": []
//! }
//! ```
//!
//! `status` is `partial` when a detector failed; the failures are listed in
//! `warnings`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sniff_survey::{ScanOutcome, StackProfile};
use std::collections::BTreeMap;

pub const STATUS_OK: &str = "ok";
pub const STATUS_PARTIAL: &str = "partial";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniffReport {
    pub status: String,

    /// RFC 3339 timestamp
    pub generated_at: String,

    pub project: String,

    /// Primary language
    pub language: Option<String>,

    /// Primary package manager of the primary language
    pub package_manager: Option<String>,

    pub languages: Vec<String>,

    pub repo: Option<String>,

    /// Every detection except `repo`
    pub services: BTreeMap<String, String>,

    pub warnings: Vec<String>,
}

impl SniffReport {
    pub fn new(project: impl Into<String>, profile: &StackProfile, outcome: &ScanOutcome) -> Self {
        let warnings: Vec<String> = outcome.failures.iter().map(ToString::to_string).collect();
        let status = if warnings.is_empty() {
            STATUS_OK
        } else {
            STATUS_PARTIAL
        };

        Self {
            status: status.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            project: project.into(),
            language: profile.primary_language().map(str::to_string),
            package_manager: profile.primary_package_manager().map(str::to_string),
            languages: profile.languages().map(str::to_string).collect(),
            repo: outcome.repo_url().map(str::to_string),
            services: outcome.services(),
            warnings,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
