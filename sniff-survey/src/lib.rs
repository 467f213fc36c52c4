//! Stack detection for stacksniff.
//!
//! This crate inspects a project directory and produces a flat map from
//! category key to value: the repository URL, confirmed third-party services,
//! and generic technologies such as CI and hosting providers.
//!
//! # Overview
//!
//! Detection runs in two phases under a [`Coordinator`]:
//!
//! - **Phase 1**: the [`RepositoryDetector`] reads the git origin, and the
//!   [`ServicesDetector`] chains language presence, manifest scanning and
//!   service resolution
//! - **Phase 2**: the [`TechnologyDetector`] matches file patterns and uses
//!   the phase-1 `repo` value to pick between competing providers
//!
//! Detectors never depend on each other; they return results and the
//! coordinator merges them. A failing detector is reported, not fatal.
//!
//! # Example
//!
//! ```no_run
//! use sniff_catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::bundled()?;
//! let (outcome, profile) = sniff_survey::scan(Path::new("."), &catalog);
//! println!("Primary language: {:?}", profile.primary_language());
//! for (key, value) in &outcome.results {
//!     println!("{}: {}", catalog.display_name(key), value);
//! }
//! # Ok::<(), sniff_catalog::CatalogError>(())
//! ```
//!
//! # Modules
//!
//! - [`patterns`]: file pattern matching shared by every detector
//! - [`detection`]: language presence
//! - [`manifest`]: manifest scanning and format rules
//! - [`services`]: service resolution
//! - [`technologies`]: generic technologies and URL building
//! - [`git`]: repository origin
//! - [`pipeline`]: detector contract and coordinator
//! - [`profile`]: languages, their manifests, and the primary language and
//!   package manager

pub mod detection;
pub mod git;
pub mod manifest;
pub mod patterns;
pub mod pipeline;
pub mod profile;
pub mod services;
pub mod technologies;

pub use detection::detect_languages;
pub use git::{GitCli, GitError, OriginSource, RepositoryDetector, normalize_remote_url};
pub use manifest::{ManifestFinding, ManifestFormat};
pub use pipeline::{
    Coordinator, DetectError, DetectionContext, DetectionResult, Detector, DetectorFailure,
    ScanOutcome, ScanState,
};
pub use profile::StackProfile;
pub use services::{ServiceDetection, ServicesDetector, resolve};
pub use technologies::{TechnologyDetector, build_url};

use sniff_catalog::Catalog;
use std::path::Path;

/// Profiles `project_root` and scans it with the standard detectors.
///
/// Languages and manifests are gathered once and shared by the profile and
/// the services detector.
pub fn scan(project_root: &Path, catalog: &Catalog) -> (ScanOutcome, StackProfile) {
    let profile = StackProfile::survey(project_root, catalog);
    let outcome = Coordinator::with_profile(catalog, &profile).run(project_root);
    (outcome, profile)
}
