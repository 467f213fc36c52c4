//! Implementation of the `stacksniff sniff` command.
//!
//! This command detects a project's stack by:
//! 1. Resolving settings from flags and environment
//! 2. Loading the bundled catalog, or the `--catalog` override
//! 3. Running the two-phase detection pipeline
//! 4. Printing the findings, or a JSON report with `--json`
//! 5. Merging the findings into the stack file unless `--no-write`
//!
//! # Usage
//!
//! ```bash
//! # Sniff the current directory
//! stacksniff sniff
//!
//! # Sniff another project without touching its stack file
//! stacksniff sniff --path ../shop --no-write
//!
//! # Machine-readable output
//! stacksniff sniff --json
//! ```

use sniff_catalog::{Catalog, title_case};
use sniff_survey::{ScanOutcome, StackProfile};

use crate::errors::SniffError;
use crate::output::{self, FOLDER, NOSE, SEARCH};
use crate::progress::ScanProgress;
use crate::report::SniffReport;
use crate::settings::SniffSettings;
use crate::stack_file;

/// Options for the `stacksniff sniff` command.
#[derive(Debug, Clone, Default)]
pub struct SniffOptions {
    /// Project directory to analyze (default: current directory).
    pub path: Option<String>,
    /// Catalog directory overriding the bundled catalog.
    pub catalog: Option<String>,
    /// Stack file to write (default: `<project>/stacksniff.yml`).
    pub output: Option<String>,
    /// Skip writing the stack file.
    pub no_write: bool,
    /// Print a JSON report instead of console lines.
    pub json: bool,
}

/// Run the `stacksniff sniff` command.
pub fn run_sniff(options: SniffOptions) -> Result<(), SniffError> {
    let settings = SniffSettings::resolve(
        options.path.as_deref(),
        options.catalog.as_deref(),
        options.output.as_deref(),
    )?
    .with_write(!options.no_write)
    .with_json(options.json);

    let project = settings.project_name();
    if !settings.json {
        output::line(&SEARCH, &format!("Analyzing project in {}...", project));
    }
    let progress = ScanProgress::new(!settings.json && !output::is_quiet());

    progress.set_status("Loading catalog...");
    let catalog = load_catalog(&settings)?;

    progress.set_status(format!("Sniffing {}...", project));
    let (outcome, profile) = sniff(&settings, &catalog);
    progress.finish();

    if settings.json {
        let report = SniffReport::new(&project, &profile, &outcome);
        println!("{}", report.to_json_pretty()?);
    } else {
        print_findings(&profile, &outcome, &catalog);
        for failure in &outcome.failures {
            output::warning(&format!("Skipped {}", failure));
        }
    }

    if !settings.write {
        output::verbose("Not writing stack file (--no-write)");
        return Ok(());
    }
    if outcome.results.is_empty() {
        output::verbose("Nothing detected, leaving stack file untouched");
        return Ok(());
    }

    let summary = stack_file::write(&settings.output_file, &project, &outcome.results, &catalog)?;
    if !settings.json {
        let path = settings.output_file.display();
        if summary.created {
            output::success(&format!("Created {} with detected services", path));
        } else {
            output::success(&format!(
                "Updated {} ({} added, {} updated)",
                path, summary.added, summary.updated
            ));
        }
    }

    Ok(())
}

fn load_catalog(settings: &SniffSettings) -> Result<Catalog, SniffError> {
    let catalog = match &settings.catalog_dir {
        Some(dir) => {
            output::verbose(&format!("Using catalog from {}", dir.display()));
            Catalog::load_dir(dir)?
        }
        None => Catalog::bundled()?,
    };
    output::verbose(&format!(
        "Catalog: {} languages, {} services, {} technologies",
        catalog.languages().len(),
        catalog.services().len(),
        catalog.technologies().len()
    ));
    Ok(catalog)
}

/// Runs the standard pipeline and the stack profile over the project.
pub fn sniff(settings: &SniffSettings, catalog: &Catalog) -> (ScanOutcome, StackProfile) {
    sniff_survey::scan(&settings.project_root, catalog)
}

fn print_findings(profile: &StackProfile, outcome: &ScanOutcome, catalog: &Catalog) {
    let languages: Vec<&str> = profile.languages().collect();
    if let Some(line) = smell_line(&languages) {
        output::line(&NOSE, &line);
    }

    if outcome.results.is_empty() {
        output::line(&SEARCH, "No services or repositories detected");
        return;
    }

    let services = outcome.services();
    if !services.is_empty() {
        output::line(&SEARCH, &format!("Detected {} service(s):", services.len()));
        for (key, value) in &services {
            output::item(&catalog.display_name(key), value);
        }
    }

    if let Some(repo) = outcome.repo_url() {
        output::line(&FOLDER, &format!("Repository: {}", repo));
    }
}

/// "Smells like Ruby in here!" for one language, a mix for several.
pub fn smell_line(languages: &[&str]) -> Option<String> {
    match languages {
        [] => None,
        [language] => Some(format!("Smells like {} in here!", title_case(language))),
        _ => {
            let names: Vec<String> = languages.iter().map(|l| title_case(l)).collect();
            Some(format!("Smells like a mix of {}!", names.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_smell_line() {
        assert_eq!(smell_line(&[]), None);
        assert_eq!(
            smell_line(&["ruby"]).as_deref(),
            Some("Smells like Ruby in here!")
        );
        assert_eq!(
            smell_line(&["nodejs", "ruby"]).as_deref(),
            Some("Smells like a mix of Nodejs, Ruby!")
        );
    }

    #[test]
    fn test_sniff_gemfile_project() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Gemfile"),
            "gem 'rails'\ngem 'stripe', '~> 5.0'\n",
        )
        .unwrap();

        let settings = SniffSettings::resolve_with_env(dir.path().to_str(), None, None, |_| None)
            .unwrap();
        let catalog = Catalog::bundled().unwrap();
        let (outcome, profile) = sniff(&settings, &catalog);

        assert_eq!(
            outcome.services().get("stripe").map(String::as_str),
            Some("https://dashboard.stripe.com")
        );
        assert!(!outcome.results.contains_key("rails"));
        assert_eq!(profile.primary_language(), Some("ruby"));
        assert_eq!(profile.primary_package_manager(), Some("bundler"));
    }

    #[test]
    fn test_run_sniff_writes_stack_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM alpine\n").unwrap();
        let output_file = dir.path().join("out").join("stack.yml");

        run_sniff(SniffOptions {
            path: dir.path().to_str().map(str::to_string),
            output: output_file.to_str().map(str::to_string),
            ..Default::default()
        })
        .unwrap();

        let content = fs::read_to_string(&output_file).unwrap();
        assert!(content.contains("Docker: https://hub.docker.com"));
    }

    #[test]
    fn test_run_sniff_no_write() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM alpine\n").unwrap();

        run_sniff(SniffOptions {
            path: dir.path().to_str().map(str::to_string),
            no_write: true,
            ..Default::default()
        })
        .unwrap();

        assert!(!dir.path().join("stacksniff.yml").exists());
    }
}
