//! Repository origin detection.
//!
//! Reads the `origin` remote of the project's git repository and normalizes
//! it to a browsable HTTPS URL, published under the `repo` key.

use crate::pipeline::{DetectError, DetectionContext, DetectionResult, Detector};
use sniff_catalog::REPO_KEY;
use std::io;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Errors from the version-control client.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable exists but could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the raw origin remote URL.
pub trait OriginSource {
    /// The configured `origin` URL, or `None` when `project_root` is not a
    /// repository or has no origin remote.
    fn origin_url(&self, project_root: &Path) -> Result<Option<String>, GitError>;
}

/// Reads the origin by running the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs git in `project_root`; `None` when git is not installed or
    /// exits unsuccessfully.
    fn run(&self, project_root: &Path, args: &[&str]) -> Result<Option<String>, GitError> {
        let output = match Command::new(&self.program)
            .arg("-C")
            .arg(project_root)
            .args(args)
            .output()
        {
            Ok(output) => output,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} is not installed: {}", self.program, source);
                return Ok(None);
            }
            Err(source) => {
                return Err(GitError::Spawn {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        if !output.status.success() {
            tracing::debug!(
                "git {} failed in {}: {}",
                args.join(" "),
                project_root.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }
}

impl OriginSource for GitCli {
    fn origin_url(&self, project_root: &Path) -> Result<Option<String>, GitError> {
        if self.run(project_root, &["rev-parse", "--git-dir"])?.is_none() {
            return Ok(None);
        }

        let url = self.run(project_root, &["remote", "get-url", "origin"])?;
        Ok(url.filter(|u| !u.is_empty()))
    }
}

/// Rewrites a git remote into a browsable HTTPS URL.
///
/// - `git@github.com:org/repo.git` becomes `https://github.com/org/repo`
/// - `https://gitlab.com/org/repo.git` becomes `https://gitlab.com/org/repo`
/// - anything else is returned unchanged
pub fn normalize_remote_url(remote: &str) -> String {
    let remote = remote.trim();

    if remote.starts_with("https://") || remote.starts_with("http://") {
        return strip_git_suffix(remote).to_string();
    }

    if let Some((host, path)) = split_scp_like(remote) {
        return format!("https://{}/{}", host, strip_git_suffix(path));
    }

    remote.to_string()
}

fn strip_git_suffix(url: &str) -> &str {
    url.strip_suffix(".git").unwrap_or(url)
}

/// Splits `user@host:path` into host and path.
fn split_scp_like(remote: &str) -> Option<(&str, &str)> {
    if remote.contains("://") {
        return None;
    }

    let (user_host, path) = remote.split_once(':')?;
    let (user, host) = user_host.split_once('@')?;
    let path = path.trim_start_matches('/');

    if user.is_empty() || host.is_empty() || host.contains('/') || path.is_empty() {
        return None;
    }
    Some((host, path))
}

/// Phase-1 detector publishing the normalized origin as `repo`.
pub struct RepositoryDetector<S = GitCli> {
    source: S,
}

impl<S: OriginSource> RepositoryDetector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: OriginSource> Detector for RepositoryDetector<S> {
    fn name(&self) -> &str {
        "repository"
    }

    fn detect(&self, context: &DetectionContext) -> Result<DetectionResult, DetectError> {
        let mut results = DetectionResult::new();

        match self.source.origin_url(context.project_root())? {
            Some(remote) => {
                let url = normalize_remote_url(&remote);
                tracing::debug!("Repository origin {} -> {}", remote, url);
                results.insert(REPO_KEY.to_string(), url);
            }
            None => {
                tracing::debug!("No repository origin for {}", context.project_root().display());
            }
        }

        Ok(results)
    }
}
