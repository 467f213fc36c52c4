//! Shared helpers for stacksniff end-to-end tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Creates `<tmp>/<name>` holding the given (relative path, content) files.
///
/// The project directory name becomes the stack file section name.
pub fn create_project(name: &str, files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join(name);
    fs::create_dir_all(&project).unwrap();
    for (path, content) in files {
        write_file(&project.join(path), content);
    }
    (temp_dir, project)
}

/// Runs the `stacksniff` binary with a clean stacksniff environment.
pub fn run_stacksniff(args: &[&str], work_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stacksniff"))
        .args(args)
        .current_dir(work_dir)
        .env_remove("STACKSNIFF_CATALOG_DIR")
        .env_remove("STACKSNIFF_OUTPUT_FILE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute stacksniff")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
