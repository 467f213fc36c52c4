//! Manifest formats and their package-declaration rules.
//!
//! Inspection is line and token based, never a full parse of the language the
//! manifest is written in. Every rule answers one question: does this manifest
//! declare exactly this package name?

use std::collections::HashSet;
use std::path::Path;

/// Delimiters separating a requirement's name from its version specifier.
const REQUIREMENT_DELIMITERS: &[char] = &['=', '>', '<', '!', '~', '[', ';', '@'];

/// Extra token delimiters for unknown formats, on top of whitespace.
const PLAIN_DELIMITERS: &[char] = &['<', '>', ':', ',', '='];

/// Gemspec calls that declare a dependency.
const GEMSPEC_CALLS: &[&str] = &[
    "add_dependency",
    "add_runtime_dependency",
    "add_development_dependency",
];

/// The closed set of manifest formats stacksniff understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    /// `package.json`: keys of `dependencies` and `devDependencies`.
    PackageJson,
    /// `Gemfile`: `gem 'name'` declarations.
    Gemfile,
    /// `requirements.txt` and friends: one pinned requirement per line.
    Requirements,
    /// `yarn.lock`: `name@range:` section headers.
    YarnLock,
    /// `*.gemspec`: `spec.add_dependency 'name'` calls.
    Gemspec,
    /// Anything else: exact whitespace-delimited tokens.
    Plain,
}

impl ManifestFormat {
    /// Picks the format for a manifest from its file name.
    pub fn for_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match file_name {
            "package.json" => return ManifestFormat::PackageJson,
            "Gemfile" | "gems.rb" => return ManifestFormat::Gemfile,
            "yarn.lock" => return ManifestFormat::YarnLock,
            _ => {}
        }

        if file_name.ends_with(".gemspec") {
            return ManifestFormat::Gemspec;
        }

        if file_name.ends_with(".txt") {
            let in_requirements_dir = path
                .parent()
                .and_then(|p| p.file_name())
                .is_some_and(|dir| dir == "requirements");
            if file_name.starts_with("requirements") || in_requirements_dir {
                return ManifestFormat::Requirements;
            }
        }

        ManifestFormat::Plain
    }

    /// Returns true if `content` declares `package`.
    pub fn declares(self, content: &str, package: &str) -> bool {
        !self.declared(content, [package]).is_empty()
    }

    /// The `candidates` that `content` declares, in candidate order.
    ///
    /// The manifest is analyzed once, however many candidates there are.
    pub fn declared<'a, I>(self, content: &str, candidates: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names = self.package_names(content);
        candidates
            .into_iter()
            .filter(|package| !package.is_empty())
            .filter(|package| match &names {
                Some(names) => names.contains(*package),
                None => self.quotes_package(content, package),
            })
            .collect()
    }

    /// Every package name declared by `content`, for formats where names can
    /// be listed without knowing what to look for.
    fn package_names(self, content: &str) -> Option<HashSet<String>> {
        match self {
            ManifestFormat::PackageJson => package_json_names(content),
            ManifestFormat::Requirements => Some(
                content
                    .lines()
                    .filter_map(requirement_name)
                    .map(str::to_string)
                    .collect(),
            ),
            ManifestFormat::YarnLock => Some(
                content
                    .lines()
                    .filter_map(yarn_lock_entry_name)
                    .map(str::to_string)
                    .collect(),
            ),
            ManifestFormat::Plain => Some(
                content
                    .split(|c: char| c.is_whitespace() || PLAIN_DELIMITERS.contains(&c))
                    .map(strip_punctuation)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            ManifestFormat::Gemfile | ManifestFormat::Gemspec => None,
        }
    }

    /// Per-package check for formats that declare names inside quotes.
    fn quotes_package(self, content: &str, package: &str) -> bool {
        match self {
            ManifestFormat::PackageJson => content.contains(&format!("\"{}\"", package)),
            ManifestFormat::Gemfile => content.lines().any(|line| {
                line.trim_start().starts_with("gem ") && contains_quoted(line, package)
            }),
            ManifestFormat::Gemspec => content.lines().any(|line| {
                GEMSPEC_CALLS.iter().any(|call| line.contains(call))
                    && contains_quoted(line, package)
            }),
            ManifestFormat::Requirements | ManifestFormat::YarnLock | ManifestFormat::Plain => false,
        }
    }
}

/// Keys of `dependencies` and `devDependencies`; `None` when the JSON is
/// malformed, which falls back to a quoted substring match.
fn package_json_names(content: &str) -> Option<HashSet<String>> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(manifest) => Some(
            ["dependencies", "devDependencies"]
                .iter()
                .filter_map(|section| manifest.get(section).and_then(|deps| deps.as_object()))
                .flat_map(|deps| deps.keys().cloned())
                .collect(),
        ),
        Err(e) => {
            tracing::debug!("Malformed package.json, falling back to substring match: {}", e);
            None
        }
    }
}

fn contains_quoted(line: &str, package: &str) -> bool {
    line.contains(&format!("'{}'", package)) || line.contains(&format!("\"{}\"", package))
}

/// The package name of a requirements line, if the line declares one.
fn requirement_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    line.split(|c: char| c.is_whitespace() || REQUIREMENT_DELIMITERS.contains(&c))
        .next()
        .filter(|name| !name.is_empty())
}

/// The package name of a yarn.lock section header such as
/// `"@scope/name@^1.0.0", "@scope/name@^1.2.0":`.
fn yarn_lock_entry_name(line: &str) -> Option<&str> {
    let header = line.trim_end().strip_suffix(':')?;
    if !header.contains('@') {
        return None;
    }

    let first = header.split(',').next()?.trim().trim_matches('"');

    // Scoped packages start with '@'; their version separator is the next one.
    let search_from = usize::from(first.starts_with('@'));
    let at = first[search_from..].find('@')? + search_from;

    let name = first[..at].trim_matches('"');
    (!name.is_empty()).then_some(name)
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| {
        c.is_ascii_punctuation() && !matches!(c, '@' | '_' | '-' | '.' | '/')
    })
}
