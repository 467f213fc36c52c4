//! Shared helpers for sniff-survey integration tests.

#![allow(dead_code)]

use sniff_survey::{GitError, OriginSource};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Creates a project tree from (relative path, content) pairs.
pub fn create_test_repo(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        write_file(&temp_dir.path().join(path), content);
    }
    temp_dir
}

/// An origin remote that never touches git.
pub struct FakeOrigin(pub Option<&'static str>);

impl OriginSource for FakeOrigin {
    fn origin_url(&self, _project_root: &Path) -> Result<Option<String>, GitError> {
        Ok(self.0.map(str::to_string))
    }
}

/// An origin source whose git executable is missing.
pub struct BrokenGit;

impl OriginSource for BrokenGit {
    fn origin_url(&self, _project_root: &Path) -> Result<Option<String>, GitError> {
        Err(GitError::Spawn {
            program: "git".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not installed"),
        })
    }
}
