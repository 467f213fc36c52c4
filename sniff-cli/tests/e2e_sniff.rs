//! End-to-end tests for the `stacksniff` binary.
//!
//! These tests run the binary as a subprocess, the way users run it, and
//! check its output, exit code and the stack file it leaves behind.

mod common;

use common::{create_project, run_stacksniff, stderr, stdout, write_file};
use pretty_assertions::assert_eq;
use std::fs;

const GEMFILE: &str = "source 'https://rubygems.org'\ngem 'rails'\ngem 'stripe', '~> 5.0'\n";

// ==================== sniff ====================

#[test]
fn test_sniff_writes_stack_file() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = run_stacksniff(&["sniff"], &project);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Smells like Ruby in here!"));
    assert!(out.contains("Stripe"));

    let content = fs::read_to_string(project.join("stacksniff.yml")).unwrap();
    assert!(content.starts_with("shop:\n"));
    assert!(content.contains("  Stripe: https://dashboard.stripe.com"));
    assert!(!content.contains("Rails"));
}

#[test]
fn test_sniff_path_flag() {
    let (tmp, project) = create_project("shop", &[("Dockerfile", "FROM alpine\n")]);

    let output = run_stacksniff(&["sniff", "--path", "shop"], tmp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = fs::read_to_string(project.join("stacksniff.yml")).unwrap();
    assert!(content.contains("Docker: https://hub.docker.com"));
}

#[test]
fn test_sniff_json_report() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = run_stacksniff(&["sniff", "--json", "--no-write"], &project);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "ok");
    assert_eq!(report["warnings"], serde_json::json!([]));
    assert_eq!(report["project"], "shop");
    assert_eq!(report["language"], "ruby");
    assert_eq!(report["package_manager"], "bundler");
    assert_eq!(report["services"]["stripe"], "https://dashboard.stripe.com");
    assert!(report["generated_at"].is_string());

    assert!(!project.join("stacksniff.yml").exists());
}

#[test]
fn test_sniff_without_git_installed_is_ok() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_stacksniff"))
        .args(["sniff", "--json", "--no-write"])
        .current_dir(&project)
        .env_remove("STACKSNIFF_CATALOG_DIR")
        .env_remove("STACKSNIFF_OUTPUT_FILE")
        .env("PATH", "")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "ok");
    assert!(report["repo"].is_null());
    assert_eq!(report["services"]["stripe"], "https://dashboard.stripe.com");
}

#[cfg(unix)]
#[test]
fn test_detector_failure_reported_once() {
    let (tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);
    // A `git` on PATH that exists but cannot be executed
    let bin = tmp.path().join("bin");
    fs::create_dir_all(bin.join("git")).unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_stacksniff"))
        .args(["sniff", "--no-write"])
        .current_dir(&project)
        .env_remove("STACKSNIFF_CATALOG_DIR")
        .env_remove("STACKSNIFF_OUTPUT_FILE")
        .env_remove("RUST_LOG")
        .env("PATH", &bin)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let err = stderr(&output);
    assert_eq!(err.matches("repository detector").count(), 1, "stderr: {}", err);
    assert!(stdout(&output).contains("Stripe"));
}

#[test]
fn test_sniff_no_write() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = run_stacksniff(&["sniff", "--no-write"], &project);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Stripe"));
    assert!(!project.join("stacksniff.yml").exists());
}

#[test]
fn test_sniff_output_flag() {
    let (tmp, project) = create_project("shop", &[("Dockerfile", "FROM alpine\n")]);
    let target = tmp.path().join("docs").join("stack.yml");

    let output = run_stacksniff(
        &["sniff", "--output", target.to_str().unwrap()],
        &project,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(target.exists());
    assert!(!project.join("stacksniff.yml").exists());
}

#[test]
fn test_sniff_output_env() {
    let (tmp, project) = create_project("shop", &[("Dockerfile", "FROM alpine\n")]);
    let target = tmp.path().join("env-stack.yml");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_stacksniff"))
        .arg("sniff")
        .current_dir(&project)
        .env_remove("STACKSNIFF_CATALOG_DIR")
        .env("STACKSNIFF_OUTPUT_FILE", &target)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(target.exists());
}

#[test]
fn test_sniff_merges_into_existing_file() {
    let (_tmp, project) = create_project(
        "shop",
        &[
            ("Gemfile", GEMFILE),
            (
                "stacksniff.yml",
                "blog:\n  hosting: https://carrd.com\nshop:\n  registrar: gandi\n",
            ),
        ],
    );

    let output = run_stacksniff(&["sniff"], &project);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let doc: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(project.join("stacksniff.yml")).unwrap())
            .unwrap();
    assert_eq!(doc["blog"]["hosting"].as_str(), Some("https://carrd.com"));
    assert_eq!(doc["shop"]["registrar"].as_str(), Some("gandi"));
    assert_eq!(
        doc["shop"]["Stripe"].as_str(),
        Some("https://dashboard.stripe.com")
    );
}

#[test]
fn test_sniff_empty_project_leaves_no_file() {
    let (_tmp, project) = create_project("empty", &[("README.md", "# nothing\n")]);

    let output = run_stacksniff(&["sniff"], &project);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No services or repositories detected"));
    assert!(!project.join("stacksniff.yml").exists());
}

#[test]
fn test_sniff_custom_catalog() {
    let (tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);
    let catalog = tmp.path().join("catalog");
    write_file(
        &catalog.join("languages.yml"),
        "languages:\n  ruby:\n    package_managers:\n      bundler:\n        files: [Gemfile]\n",
    );
    write_file(
        &catalog.join("services.yml"),
        "services:\n  rails:\n    name: Rails\n    url: https://rubyonrails.org\n    stacks:\n      ruby: [rails]\n",
    );
    write_file(&catalog.join("technologies.yml"), "technologies: {}\n");

    let output = run_stacksniff(
        &["sniff", "--json", "--no-write", "--catalog", catalog.to_str().unwrap()],
        &project,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["services"]["rails"], "https://rubyonrails.org");
    assert!(report["services"].get("stripe").is_none());
}

// ==================== Errors ====================

#[test]
fn test_sniff_missing_path_fails() {
    let (tmp, _project) = create_project("shop", &[]);

    let output = run_stacksniff(&["sniff", "--path", "does-not-exist"], tmp.path());
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("Project directory not found"));
    assert!(err.contains("Suggestion:"));
}

#[test]
fn test_sniff_missing_catalog_fails() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = run_stacksniff(&["sniff", "--catalog", "no-such-catalog"], &project);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("STACKSNIFF_CATALOG_DIR"));
}

#[test]
fn test_sniff_broken_stack_file_fails() {
    let (_tmp, project) = create_project(
        "shop",
        &[("Gemfile", GEMFILE), ("stacksniff.yml", "shop: [unclosed\n")],
    );

    let output = run_stacksniff(&["sniff"], &project);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--no-write"));

    let content = fs::read_to_string(project.join("stacksniff.yml")).unwrap();
    assert_eq!(content, "shop: [unclosed\n");
}

// ==================== init ====================

#[test]
fn test_init_workflow() {
    let (_tmp, project) = create_project("shop", &[]);

    let output = run_stacksniff(&["init"], &project);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let content = fs::read_to_string(project.join("stacksniff.yml")).unwrap();
    assert!(content.contains("registrar: gandi"));

    let output = run_stacksniff(&["init"], &project);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--force"));

    let output = run_stacksniff(&["init", "--force"], &project);
    assert!(output.status.success());
}

#[test]
fn test_quiet_flag() {
    let (_tmp, project) = create_project("shop", &[("Gemfile", GEMFILE)]);

    let output = run_stacksniff(&["sniff", "--quiet"], &project);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert!(project.join("stacksniff.yml").exists());
}
