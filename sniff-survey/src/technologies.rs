//! Generic technology detection (CI, hosting, IaC, containers).
//!
//! Technologies are found by file presence alone. Each one belongs to a
//! category; when several technologies of one category are present, the
//! repository URL published in phase 1 decides which of them is real.
//!
//! | Candidates | Repo matches one | Emitted                              |
//! |------------|------------------|--------------------------------------|
//! | 1          | -                | that technology, via [`build_url`]   |
//! | 2+         | yes              | the matching one, via [`build_url`]  |
//! | 2+         | no               | every candidate, with its fallback   |

use crate::patterns;
use crate::pipeline::{DetectError, DetectionContext, DetectionResult, Detector};
use sniff_catalog::{Catalog, Technology};
use std::collections::BTreeMap;

/// Builds the reported value for a matched technology.
///
/// The template is used only when a repository URL is known and, if the
/// technology is tied to a hosting provider, that URL is hosted there.
/// Otherwise the fallback URL, or the id, is returned.
pub fn build_url(id: &str, technology: &Technology, repo_url: Option<&str>) -> String {
    let (Some(repo), Some(template)) = (repo_url, technology.url_template.as_deref()) else {
        return technology.fallback(id).to_string();
    };

    if technology.hosting_match.is_some() && !technology.matches_hosting(repo) {
        tracing::debug!("{} does not match repository host of {}", id, repo);
        return technology.fallback(id).to_string();
    }

    template.replace("{repo}", repo)
}

/// Phase-2 detector for catalog technologies.
pub struct TechnologyDetector<'a> {
    catalog: &'a Catalog,
}

impl<'a> TechnologyDetector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Present technologies grouped by category, each group in id order.
    fn candidates_by_category(
        &self,
        context: &DetectionContext,
    ) -> BTreeMap<&'a str, Vec<(&'a str, &'a Technology)>> {
        let mut by_category: BTreeMap<&str, Vec<(&str, &Technology)>> = BTreeMap::new();

        for (id, technology) in self.catalog.technologies() {
            let present = patterns::any_match(
                context.project_root(),
                technology.files.iter().map(String::as_str),
            );
            if present {
                by_category
                    .entry(technology.category(id))
                    .or_default()
                    .push((id.as_str(), technology));
            }
        }

        by_category
    }
}

impl Detector for TechnologyDetector<'_> {
    fn name(&self) -> &str {
        "technologies"
    }

    fn detect(&self, context: &DetectionContext) -> Result<DetectionResult, DetectError> {
        let repo = context.repo_url();
        let mut results = DetectionResult::new();

        for (category, candidates) in self.candidates_by_category(context) {
            if let [(id, technology)] = candidates.as_slice() {
                results.insert(id.to_string(), build_url(id, technology, repo));
                continue;
            }

            let winner = repo.and_then(|repo| {
                candidates
                    .iter()
                    .find(|(_, technology)| technology.matches_hosting(repo))
            });

            match winner {
                Some((id, technology)) => {
                    tracing::debug!("Category {} resolved to {} by repository host", category, id);
                    results.insert(id.to_string(), build_url(id, technology, repo));
                }
                None => {
                    let ids: Vec<&str> = candidates.iter().map(|(id, _)| *id).collect();
                    tracing::info!(
                        "Category {} is ambiguous ({}), reporting every candidate",
                        category,
                        ids.join(", ")
                    );
                    for (id, technology) in &candidates {
                        results.insert(id.to_string(), technology.fallback(id).to_string());
                    }
                }
            }
        }

        Ok(results)
    }
}
