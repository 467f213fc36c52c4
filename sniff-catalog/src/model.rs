//! Catalog entry types.
//!
//! These mirror the YAML schema of the bundled data files one-to-one. Maps are
//! `BTreeMap`s so that every walk over the catalog happens in id order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A package manager and the files that betray its presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManager {
    /// File patterns relative to the project root, in declaration order.
    pub files: Vec<String>,
}

impl PackageManager {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// A language ecosystem, identified by its package managers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default)]
    pub package_managers: BTreeMap<String, PackageManager>,
}

impl Language {
    /// Adds a package manager, returning the language for chaining.
    pub fn with_package_manager(mut self, id: impl Into<String>, pm: PackageManager) -> Self {
        self.package_managers.insert(id.into(), pm);
        self
    }

    /// Every file pattern of every package manager, deduplicated, in
    /// package-manager order.
    pub fn all_patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = Vec::new();
        for pm in self.package_managers.values() {
            for file in &pm.files {
                if !patterns.contains(&file.as_str()) {
                    patterns.push(file);
                }
            }
        }
        patterns
    }
}

/// A third-party service confirmed through declared packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Human-readable name (e.g. "Stripe").
    #[serde(rename = "name")]
    pub display_name: String,

    /// Dashboard or landing URL reported when the service is detected.
    #[serde(default)]
    pub url: String,

    /// Package names per language id. Exact tokens, not patterns.
    #[serde(rename = "stacks", default)]
    pub packages: BTreeMap<String, Vec<String>>,
}

impl Service {
    pub fn new(display_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            url: url.into(),
            packages: BTreeMap::new(),
        }
    }

    /// Declares the packages that confirm this service for `language`.
    pub fn with_packages<I, S>(mut self, language: impl Into<String>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.insert(
            language.into(),
            packages.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Whether `package` confirms this service for `language`.
    pub fn confirms(&self, language: &str, package: &str) -> bool {
        self.packages
            .get(language)
            .is_some_and(|pkgs| pkgs.iter().any(|p| p == package))
    }

    /// The value reported for this service: its URL, or `id` when it has none.
    pub fn report_value<'a>(&'a self, id: &'a str) -> &'a str {
        if self.url.is_empty() { id } else { &self.url }
    }
}

/// A technology detected by file presence alone (CI, hosting, IaC...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub display_name: String,

    /// Technologies sharing a category compete for it. Defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub files: Vec<String>,

    /// URL template containing a `{repo}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,

    /// Substring the repository URL must contain for the template to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

impl Technology {
    pub fn new<I, S>(display_name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            display_name: display_name.into(),
            files: files.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }

    pub fn with_hosting_match(mut self, hosting: impl Into<String>) -> Self {
        self.hosting_match = Some(hosting.into());
        self
    }

    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into());
        self
    }

    /// The category this technology competes in. Without an explicit
    /// category a technology owns a category named after its own id.
    pub fn category<'a>(&'a self, id: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(id)
    }

    /// Whether the given repository URL is hosted where this technology lives.
    ///
    /// Technologies without a `hosting_match` never match.
    pub fn matches_hosting(&self, repo_url: &str) -> bool {
        self.hosting_match
            .as_deref()
            .is_some_and(|hosting| repo_url.contains(hosting))
    }

    /// The value used when the URL template cannot be applied.
    pub fn fallback<'a>(&'a self, id: &'a str) -> &'a str {
        self.fallback_url.as_deref().unwrap_or(id)
    }
}
