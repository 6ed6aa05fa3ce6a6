//! `GitHost` backed by the system `git` binary
//!
//! Clones shell out to `git clone` so that the remote's own diagnostics are
//! available for failure classification. History is read from the fresh
//! working copy with gix.

use crate::error::{CloneError, Error, Result};
use crate::host::{GitHost, strip_credentials};
use crate::types::{Commit, WorkingCopy};
use async_trait::async_trait;
use chrono::DateTime;
use std::fmt::Display;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

const CHECKOUT_FAILED_MARKER: &str = "clone succeeded, but checkout failed";

/// Git host using `git clone` and gix
#[derive(Debug, Clone, Default)]
pub struct GitCliHost;

impl GitCliHost {
    /// Create a new host
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GitHost for GitCliHost {
    #[instrument(skip_all, fields(dest = %destination.display()))]
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
    ) -> std::result::Result<WorkingCopy, CloneError> {
        debug!(url = %strip_credentials(url), "spawning git clone");

        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(url)
            .arg(destination)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CloneError::Transport(format!("failed to spawn git clone: {e}")))?;

        if output.status.success() {
            debug!("git clone succeeded");
            return Ok(WorkingCopy {
                path: destination.to_path_buf(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_clone_failure(&stderr, destination))
    }

    #[instrument(skip_all, fields(path = %working_copy.path.display()))]
    async fn list_commits(&self, working_copy: &WorkingCopy) -> Result<Vec<Commit>> {
        let path = working_copy.path.clone();
        tokio::task::spawn_blocking(move || read_history(&path))
            .await
            .map_err(|e| Error::Internal(format!("history task failed: {e}")))?
    }
}

/// Classify a failed `git clone` from its stderr
///
/// Priority: missing repository, then failed checkout, then anything else.
pub fn classify_clone_failure(stderr: &str, destination: &Path) -> CloneError {
    let lower = stderr.to_lowercase();

    let not_found = lower.contains("repository not found")
        || lower
            .lines()
            .any(|line| line.contains("repository '") && line.trim_end().ends_with("' not found"));
    if not_found {
        return CloneError::NotFound;
    }

    if lower.contains(CHECKOUT_FAILED_MARKER) {
        return CloneError::CheckoutFailed {
            working_copy: WorkingCopy {
                path: destination.to_path_buf(),
            },
        };
    }

    CloneError::Transport(stderr.trim().to_string())
}

fn git_err(e: impl Display) -> Error {
    Error::Git(e.to_string())
}

/// Walk history from HEAD, newest first
fn read_history(path: &Path) -> Result<Vec<Commit>> {
    let repo = gix::open(path).map_err(git_err)?;

    let head = repo.head().map_err(git_err)?;
    if head.is_unborn() {
        return Ok(Vec::new());
    }

    let tip = repo.head_commit().map_err(git_err)?;
    let walk = tip.ancestors().all().map_err(git_err)?;

    let mut commits = Vec::new();
    for info in walk {
        let info = info.map_err(git_err)?;
        let commit = info.object().map_err(git_err)?;
        let author = commit.author().map_err(git_err)?.name.to_string();
        let seconds = commit.time().map_err(git_err)?.seconds;

        commits.push(Commit {
            hash: commit.id.to_string(),
            author,
            message: commit.message_raw_sloppy().to_string(),
            timestamp: DateTime::from_timestamp(seconds, 0).unwrap_or_default(),
        });
    }

    Ok(commits)
}
