//! The two-phase detection pipeline.
//!
//! Detectors never see each other. Each one receives a [`DetectionContext`]
//! and returns a [`DetectionResult`]; the [`Coordinator`] owns all state and
//! does every merge.
//!
//! ```text
//!   Phase 1 (independent)          Phase 2 (context-aware)
//!   ┌──────────────────────┐       ┌────────────────────────┐
//!   │ repository origin    │──┐    │ generic technologies   │
//!   │ services             │──┼──▶ │ (reads "repo" etc.)    │──▶ final map
//!   └──────────────────────┘  │    └────────────────────────┘
//!                             └── published snapshot
//! ```
//!
//! A failing detector is logged and reported in [`ScanOutcome::failures`];
//! its contribution is dropped and the scan carries on.

use crate::git::{GitCli, GitError, RepositoryDetector};
use crate::profile::StackProfile;
use crate::services::ServicesDetector;
use crate::technologies::TechnologyDetector;
use sniff_catalog::{Catalog, REPO_KEY};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Category key to value, as produced by one detector or by a whole scan.
pub type DetectionResult = BTreeMap<String, String>;

/// Errors a detector may report. The coordinator never propagates them.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The version-control client could not be run.
    #[error("Version control error: {0}")]
    Git(#[from] GitError),

    /// A detector's internal invariant did not hold.
    #[error("{detector} detector failed: {reason}")]
    Failed { detector: String, reason: String },
}

/// What a detector is allowed to see of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionContext {
    project_root: PathBuf,
    published: DetectionResult,
}

impl DetectionContext {
    /// A context with nothing published yet, as seen by phase-1 detectors.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_published(project_root, DetectionResult::new())
    }

    /// A context carrying earlier findings, as seen by phase-2 detectors.
    pub fn with_published(project_root: impl Into<PathBuf>, published: DetectionResult) -> Self {
        Self {
            project_root: project_root.into(),
            published,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn published(&self) -> &DetectionResult {
        &self.published
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.published.get(key).map(String::as_str)
    }

    /// The repository URL published in phase 1, if any.
    pub fn repo_url(&self) -> Option<&str> {
        self.get(REPO_KEY)
    }
}

/// A detection plugin.
pub trait Detector {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Inspects the project and returns its findings.
    fn detect(&self, context: &DetectionContext) -> Result<DetectionResult, DetectError>;
}

/// Where a scan is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Phase1Running,
    Phase2Running,
    Done,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanState::Phase1Running => write!(f, "phase 1"),
            ScanState::Phase2Running => write!(f, "phase 2"),
            ScanState::Done => write!(f, "done"),
        }
    }
}

/// A detector whose contribution was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorFailure {
    pub detector: String,
    pub phase: ScanState,
    pub message: String,
}

impl fmt::Display for DetectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} detector ({}): {}", self.detector, self.phase, self.message)
    }
}

/// Everything a scan produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub results: DetectionResult,
    pub failures: Vec<DetectorFailure>,
}

impl ScanOutcome {
    pub fn repo_url(&self) -> Option<&str> {
        self.results.get(REPO_KEY).map(String::as_str)
    }

    /// Every finding except the repository URL.
    pub fn services(&self) -> DetectionResult {
        self.results
            .iter()
            .filter(|(key, _)| key.as_str() != REPO_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Runs detectors in two ordered phases and merges their output.
#[derive(Default)]
pub struct Coordinator<'a> {
    phase1: Vec<Box<dyn Detector + 'a>>,
    phase2: Vec<Box<dyn Detector + 'a>>,
}

impl<'a> Coordinator<'a> {
    pub fn new() -> Self {
        Self {
            phase1: Vec::new(),
            phase2: Vec::new(),
        }
    }

    /// The standard pipeline: repository origin and services in phase 1,
    /// generic technologies in phase 2.
    pub fn with_defaults(catalog: &'a Catalog) -> Self {
        Self::new()
            .with_phase1(ServicesDetector::new(catalog))
            .with_phase1(RepositoryDetector::new(GitCli::default()))
            .with_phase2(TechnologyDetector::new(catalog))
    }

    /// The standard pipeline, with services resolved from an existing
    /// profile of the project instead of a fresh survey.
    pub fn with_profile(catalog: &'a Catalog, profile: &'a StackProfile) -> Self {
        Self::new()
            .with_phase1(ServicesDetector::with_profile(catalog, profile))
            .with_phase1(RepositoryDetector::new(GitCli::default()))
            .with_phase2(TechnologyDetector::new(catalog))
    }

    pub fn with_phase1(mut self, detector: impl Detector + 'a) -> Self {
        self.phase1.push(Box::new(detector));
        self
    }

    pub fn with_phase2(mut self, detector: impl Detector + 'a) -> Self {
        self.phase2.push(Box::new(detector));
        self
    }

    /// Scans `project_root` and returns the merged findings.
    pub fn run(&self, project_root: &Path) -> ScanOutcome {
        let mut failures = Vec::new();

        // Phase 1: detectors only see the project root.
        let phase1_context = DetectionContext::new(project_root);
        let published = run_phase(
            &self.phase1,
            &phase1_context,
            ScanState::Phase1Running,
            DetectionResult::new(),
            &mut failures,
        );
        tracing::info!(
            "Phase 1 published {} finding(s) for {}",
            published.len(),
            project_root.display()
        );

        // Phase 2: detectors read a snapshot of phase-1 findings.
        let phase2_context = DetectionContext::with_published(project_root, published.clone());
        let results = run_phase(
            &self.phase2,
            &phase2_context,
            ScanState::Phase2Running,
            published,
            &mut failures,
        );

        tracing::info!(
            "Scan {}: {} finding(s), {} detector failure(s)",
            ScanState::Done,
            results.len(),
            failures.len()
        );

        ScanOutcome { results, failures }
    }
}

fn run_phase(
    detectors: &[Box<dyn Detector + '_>],
    context: &DetectionContext,
    phase: ScanState,
    mut merged: DetectionResult,
    failures: &mut Vec<DetectorFailure>,
) -> DetectionResult {
    for detector in detectors {
        tracing::debug!("Running {} detector ({})", detector.name(), phase);

        match detector.detect(context) {
            Ok(results) => merge_results(&mut merged, results, detector.name()),
            Err(e) => {
                // Reported to the caller through ScanOutcome::failures
                tracing::info!("Dropping {} detector results ({}): {}", detector.name(), phase, e);
                failures.push(DetectorFailure {
                    detector: detector.name().to_string(),
                    phase,
                    message: e.to_string(),
                });
            }
        }
    }
    merged
}

/// Last write wins; a changed value is worth a warning.
fn merge_results(target: &mut DetectionResult, results: DetectionResult, detector: &str) {
    for (key, value) in results {
        if let Some(previous) = target.get(&key) {
            if *previous != value {
                tracing::warn!(
                    "{} detector overrides '{}': {} -> {}",
                    detector,
                    key,
                    previous,
                    value
                );
            }
        }
        target.insert(key, value);
    }
}
