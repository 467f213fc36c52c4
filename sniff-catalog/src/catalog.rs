//! The immutable manifest catalog.
//!
//! A [`Catalog`] is loaded once per process, either from the data bundled into
//! the binary or from a directory holding the same three YAML files, and is
//! then passed by reference to every detector. It is never mutated after
//! [`Catalog::new`] has validated it.

use crate::error::CatalogError;
use crate::model::{Language, Service, Technology};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// File name of the language/package-manager catalog.
pub const LANGUAGES_FILE: &str = "languages.yml";

/// File name of the service catalog.
pub const SERVICES_FILE: &str = "services.yml";

/// File name of the generic technology catalog.
pub const TECHNOLOGIES_FILE: &str = "technologies.yml";

/// Category key under which the repository URL is published.
pub const REPO_KEY: &str = "repo";

const BUNDLED_LANGUAGES: &str = include_str!("../data/languages.yml");
const BUNDLED_SERVICES: &str = include_str!("../data/services.yml");
const BUNDLED_TECHNOLOGIES: &str = include_str!("../data/technologies.yml");

#[derive(Deserialize)]
struct LanguagesFile {
    #[serde(default)]
    languages: BTreeMap<String, Language>,
}

#[derive(Deserialize)]
struct ServicesFile {
    #[serde(default)]
    services: BTreeMap<String, Service>,
}

#[derive(Deserialize)]
struct TechnologiesFile {
    #[serde(default)]
    technologies: BTreeMap<String, Technology>,
}

/// Static description of languages, services and technologies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    languages: BTreeMap<String, Language>,
    services: BTreeMap<String, Service>,
    technologies: BTreeMap<String, Technology>,
}

impl Catalog {
    /// Builds a catalog from already-parsed entries, validating every invariant.
    pub fn new(
        languages: BTreeMap<String, Language>,
        services: BTreeMap<String, Service>,
        technologies: BTreeMap<String, Technology>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            languages,
            services,
            technologies,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads the catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_LANGUAGES, BUNDLED_SERVICES, BUNDLED_TECHNOLOGIES)
    }

    /// Parses a catalog from the contents of its three YAML documents.
    pub fn from_yaml(
        languages: &str,
        services: &str,
        technologies: &str,
    ) -> Result<Self, CatalogError> {
        let languages: LanguagesFile = parse(LANGUAGES_FILE, languages)?;
        let services: ServicesFile = parse(SERVICES_FILE, services)?;
        let technologies: TechnologiesFile = parse(TECHNOLOGIES_FILE, technologies)?;

        Self::new(
            languages.languages,
            services.services,
            technologies.technologies,
        )
    }

    /// Loads `languages.yml`, `services.yml` and `technologies.yml` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| CatalogError::Read { path, source })
        };

        Self::from_yaml(
            &read(LANGUAGES_FILE)?,
            &read(SERVICES_FILE)?,
            &read(TECHNOLOGIES_FILE)?,
        )
    }

    pub fn languages(&self) -> &BTreeMap<String, Language> {
        &self.languages
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.get(id)
    }

    pub fn services(&self) -> &BTreeMap<String, Service> {
        &self.services
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.get(id)
    }

    pub fn technologies(&self) -> &BTreeMap<String, Technology> {
        &self.technologies
    }

    pub fn technology(&self, id: &str) -> Option<&Technology> {
        self.technologies.get(id)
    }

    /// Every package name any service declares for `language`.
    ///
    /// This is the vocabulary a manifest of that language is searched for.
    pub fn packages_for_language(&self, language: &str) -> BTreeSet<&str> {
        self.services
            .values()
            .filter_map(|service| service.packages.get(language))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Human-readable name for a result key.
    ///
    /// Technologies win over services when both define the key; `repo` is
    /// shown as "Repository"; unknown keys get their first letter upper-cased.
    pub fn display_name(&self, key: &str) -> String {
        if let Some(tech) = self.technologies.get(key) {
            if !tech.display_name.is_empty() {
                return tech.display_name.clone();
            }
        }

        if let Some(service) = self.services.get(key) {
            if !service.display_name.is_empty() {
                return service.display_name.clone();
            }
        }

        if key == REPO_KEY {
            return "Repository".to_string();
        }

        title_case(key)
    }

    /// Inverse of [`Catalog::display_name`].
    ///
    /// Known display names map back to their key; anything else is
    /// lower-cased, which inverts the title-case fallback for lower-case keys.
    pub fn key_for_display_name(&self, display_name: &str) -> String {
        if display_name == "Repository" {
            return REPO_KEY.to_string();
        }

        let known = self
            .technologies
            .keys()
            .chain(self.services.keys())
            .find(|key| self.display_name(key) == display_name);

        match known {
            Some(key) => key.clone(),
            None => display_name.to_lowercase(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (id, language) in &self.languages {
            if language.package_managers.is_empty() {
                return Err(CatalogError::invalid(
                    format!("languages.{}", id),
                    "at least one package manager is required",
                ));
            }
            for (pm_id, pm) in &language.package_managers {
                if pm.files.is_empty() || pm.files.iter().any(|f| f.trim().is_empty()) {
                    return Err(CatalogError::invalid(
                        format!("languages.{}.package_managers.{}", id, pm_id),
                        "file list must be non-empty and contain no blank patterns",
                    ));
                }
            }
        }

        for (id, service) in &self.services {
            for (language, packages) in &service.packages {
                if packages.iter().any(|p| p.trim().is_empty()) {
                    return Err(CatalogError::invalid(
                        format!("services.{}.stacks.{}", id, language),
                        "package names must not be blank",
                    ));
                }
            }
        }

        for (id, tech) in &self.technologies {
            let entry = || format!("technologies.{}", id);

            if tech.files.is_empty() || tech.files.iter().any(|f| f.trim().is_empty()) {
                return Err(CatalogError::invalid(
                    entry(),
                    "file list must be non-empty and contain no blank patterns",
                ));
            }
            if tech.hosting_match.as_deref().is_some_and(str::is_empty) {
                return Err(CatalogError::invalid(entry(), "hosting_match must not be empty"));
            }
            if let Some(template) = &tech.url_template {
                if !template.contains("{repo}") {
                    return Err(CatalogError::invalid(
                        entry(),
                        "url_template must contain a {repo} placeholder",
                    ));
                }
            }
        }

        self.validate_keys()
    }

    /// Result keys and display names must be unique across services and
    /// technologies, and `repo` is reserved for the repository origin.
    fn validate_keys(&self) -> Result<(), CatalogError> {
        let entries = self
            .services
            .keys()
            .map(|id| (format!("services.{}", id), id))
            .chain(
                self.technologies
                    .keys()
                    .map(|id| (format!("technologies.{}", id), id)),
            );

        let mut names: BTreeMap<String, String> = BTreeMap::new();
        names.insert("Repository".to_string(), REPO_KEY.to_string());

        for (entry, id) in entries {
            if id == REPO_KEY {
                return Err(CatalogError::invalid(
                    entry,
                    format!("id '{}' is reserved for the repository origin", REPO_KEY),
                ));
            }
            if self.services.contains_key(id) && self.technologies.contains_key(id) {
                return Err(CatalogError::invalid(
                    entry,
                    "id is used by both a service and a technology",
                ));
            }

            let name = self.display_name(id);
            if let Some(owner) = names.insert(name.clone(), id.clone()) {
                return Err(CatalogError::invalid(
                    entry,
                    format!("display name '{}' is already used by '{}'", name, owner),
                ));
            }
        }

        Ok(())
    }
}

fn parse<T: for<'de> Deserialize<'de>>(file: &str, content: &str) -> Result<T, CatalogError> {
    serde_yaml::from_str(content).map_err(|source| CatalogError::Parse {
        file: file.to_string(),
        source,
    })
}

/// Upper-cases the first letter of `key`.
pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
