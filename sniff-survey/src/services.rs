//! Service resolution.
//!
//! Turns manifest findings into confirmed third-party services. A service is
//! reported once no matter how many manifests or languages confirm it.

use crate::manifest::{self, ManifestFinding};
use crate::pipeline::{DetectError, DetectionContext, DetectionResult, Detector};
use crate::profile::StackProfile;
use serde::Serialize;
use sniff_catalog::Catalog;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// A service confirmed by at least one declared package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDetection {
    pub service_id: String,

    /// The alphabetically first language that confirmed the service.
    pub language: String,

    pub matched_packages: BTreeSet<String>,
}

impl ServiceDetection {
    pub fn new<I, S>(service_id: impl Into<String>, language: impl Into<String>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service_id: service_id.into(),
            language: language.into(),
            matched_packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Folds another detection of the same service into this one.
    ///
    /// Packages are unioned and the smaller language id is kept, so merging
    /// is commutative and idempotent.
    pub fn merge(&mut self, other: ServiceDetection) {
        debug_assert_eq!(self.service_id, other.service_id);

        if other.language < self.language {
            self.language = other.language;
        }
        self.matched_packages.extend(other.matched_packages);
    }

    pub fn merged(mut self, other: ServiceDetection) -> Self {
        self.merge(other);
        self
    }
}

/// Confirms services from `findings`, one detection per service, ordered by id.
///
/// Services with no confirming package are absent from the result.
pub fn resolve(findings: &[ManifestFinding], catalog: &Catalog) -> Vec<ServiceDetection> {
    let mut detections: BTreeMap<&str, ServiceDetection> = BTreeMap::new();

    for finding in findings {
        for (id, service) in catalog.services() {
            if !service.confirms(&finding.language, &finding.package_name) {
                continue;
            }

            let detection = ServiceDetection::new(
                id.as_str(),
                finding.language.as_str(),
                [finding.package_name.as_str()],
            );
            match detections.entry(id.as_str()) {
                Entry::Occupied(mut existing) => existing.get_mut().merge(detection),
                Entry::Vacant(slot) => {
                    slot.insert(detection);
                }
            }
        }
    }

    detections.into_values().collect()
}

/// Languages, then manifests, then services, behind the detector contract.
pub struct ServicesDetector<'a> {
    catalog: &'a Catalog,
    profile: Option<&'a StackProfile>,
}

impl<'a> ServicesDetector<'a> {
    /// A detector that surveys the project root it is given.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            profile: None,
        }
    }

    /// A detector reusing the languages and manifests of `profile`, which
    /// must have been surveyed from the same project root.
    pub fn with_profile(catalog: &'a Catalog, profile: &'a StackProfile) -> Self {
        Self {
            catalog,
            profile: Some(profile),
        }
    }

    /// Runs the full resolution chain and returns the detailed detections.
    pub fn detections(&self, context: &DetectionContext) -> Vec<ServiceDetection> {
        let root = context.project_root();
        let surveyed;
        let profile = match self.profile {
            Some(profile) => profile,
            None => {
                surveyed = StackProfile::survey(root, self.catalog);
                &surveyed
            }
        };

        if profile.is_empty() {
            tracing::debug!("No languages detected in {}, skipping services", root.display());
            return Vec::new();
        }

        let findings: Vec<ManifestFinding> = profile
            .languages()
            .flat_map(|language| {
                manifest::findings(language, profile.manifests(language), self.catalog)
            })
            .collect();

        resolve(&findings, self.catalog)
    }
}

impl Detector for ServicesDetector<'_> {
    fn name(&self) -> &str {
        "services"
    }

    fn detect(&self, context: &DetectionContext) -> Result<DetectionResult, DetectError> {
        let mut results = DetectionResult::new();

        for detection in self.detections(context) {
            let Some(service) = self.catalog.service(&detection.service_id) else {
                return Err(DetectError::Failed {
                    detector: self.name().to_string(),
                    reason: format!("service '{}' vanished from the catalog", detection.service_id),
                });
            };
            tracing::debug!(
                "Service {} confirmed via {} ({})",
                detection.service_id,
                detection.language,
                detection.matched_packages.iter().cloned().collect::<Vec<_>>().join(", ")
            );
            let value = service.report_value(&detection.service_id).to_string();
            results.insert(detection.service_id, value);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sniff_catalog::{Language, PackageManager, Service};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_catalog() -> Catalog {
        let mut languages = BTreeMap::new();
        languages.insert(
            "ruby".to_string(),
            Language::default().with_package_manager("bundler", PackageManager::new(["Gemfile"])),
        );
        languages.insert(
            "nodejs".to_string(),
            Language::default().with_package_manager("npm", PackageManager::new(["package.json"])),
        );

        let mut services = BTreeMap::new();
        services.insert(
            "stripe".to_string(),
            Service::new("Stripe", "https://dashboard.stripe.com")
                .with_packages("ruby", ["stripe", "stripe_event"])
                .with_packages("nodejs", ["stripe"]),
        );
        services.insert(
            "sentry".to_string(),
            Service::new("Sentry", "").with_packages("nodejs", ["@sentry/node"]),
        );

        Catalog::new(languages, services, BTreeMap::new()).unwrap()
    }

    fn finding(language: &str, file: &str, package: &str) -> ManifestFinding {
        ManifestFinding {
            language: language.to_string(),
            file_path: PathBuf::from(file),
            package_name: package.to_string(),
        }
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_is_commutative() {
        let a = ServiceDetection::new("stripe", "ruby", ["stripe"]);
        let b = ServiceDetection::new("stripe", "nodejs", ["stripe", "stripe_event"]);

        assert_eq!(a.clone().merged(b.clone()), b.merged(a));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = ServiceDetection::new("stripe", "ruby", ["stripe", "stripe_event"]);
        assert_eq!(a.clone().merged(a.clone()), a);
    }

    #[test]
    fn test_merge_keeps_first_language_alphabetically() {
        let merged = ServiceDetection::new("stripe", "ruby", ["stripe"])
            .merged(ServiceDetection::new("stripe", "nodejs", ["stripe"]));
        assert_eq!(merged.language, "nodejs");
    }

    // ==================== Resolve Tests ====================

    #[test]
    fn test_resolve_merges_across_files_and_languages() {
        let findings = vec![
            finding("ruby", "Gemfile", "stripe"),
            finding("ruby", "api/Gemfile", "stripe_event"),
            finding("nodejs", "package.json", "stripe"),
        ];

        let detections = resolve(&findings, &test_catalog());
        assert_eq!(
            detections,
            vec![ServiceDetection::new("stripe", "nodejs", ["stripe", "stripe_event"])]
        );
    }

    #[test]
    fn test_resolve_requires_matching_language() {
        // stripe_event confirms stripe for ruby only
        let findings = vec![finding("nodejs", "package.json", "stripe_event")];
        assert!(resolve(&findings, &test_catalog()).is_empty());
    }

    #[test]
    fn test_resolve_orders_by_service_id() {
        let findings = vec![
            finding("nodejs", "package.json", "stripe"),
            finding("nodejs", "package.json", "@sentry/node"),
        ];

        let ids: Vec<String> = resolve(&findings, &test_catalog())
            .into_iter()
            .map(|d| d.service_id)
            .collect();
        assert_eq!(ids, vec!["sentry", "stripe"]);
    }

    #[test]
    fn test_resolve_no_findings() {
        assert!(resolve(&[], &test_catalog()).is_empty());
    }

    // ==================== Detector Tests ====================

    #[test]
    fn test_detector_gemfile_with_stripe_and_rails() {
        let repo = TempDir::new().unwrap();
        fs::write(
            repo.path().join("Gemfile"),
            "source 'https://rubygems.org'\ngem 'rails'\ngem 'stripe', '~> 5.0'\n",
        )
        .unwrap();

        let catalog = test_catalog();
        let results = ServicesDetector::new(&catalog)
            .detect(&DetectionContext::new(repo.path()))
            .unwrap();

        let expected: DetectionResult =
            [("stripe".to_string(), "https://dashboard.stripe.com".to_string())].into();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_detector_reports_id_when_service_has_no_url() {
        let repo = TempDir::new().unwrap();
        fs::write(
            repo.path().join("package.json"),
            r#"{"dependencies": {"@sentry/node": "^7.0.0"}}"#,
        )
        .unwrap();

        let catalog = test_catalog();
        let results = ServicesDetector::new(&catalog)
            .detect(&DetectionContext::new(repo.path()))
            .unwrap();
        assert_eq!(results.get("sentry").map(String::as_str), Some("sentry"));
    }

    #[test]
    fn test_detector_without_manifests() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("README.md"), "stripe").unwrap();

        let catalog = test_catalog();
        let results = ServicesDetector::new(&catalog)
            .detect(&DetectionContext::new(repo.path()))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_detector_reuses_profile_manifests() {
        let repo = TempDir::new().unwrap();
        let gemfile = repo.path().join("Gemfile");
        fs::write(&gemfile, "gem 'stripe'\n").unwrap();

        let mut manifests = BTreeMap::new();
        manifests.insert(
            "ruby".to_string(),
            BTreeMap::from([("bundler".to_string(), BTreeSet::from([gemfile]))]),
        );
        let profile = StackProfile::from_manifests(manifests);

        // The context root holds nothing; only the profile's files are read
        let empty = TempDir::new().unwrap();
        let catalog = test_catalog();
        let results = ServicesDetector::with_profile(&catalog, &profile)
            .detect(&DetectionContext::new(empty.path()))
            .unwrap();
        assert_eq!(
            results.get("stripe").map(String::as_str),
            Some("https://dashboard.stripe.com")
        );
    }
}
