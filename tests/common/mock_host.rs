//! Mock git host for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use classroom_pull::error::{CloneError, Error, Result};
use classroom_pull::host::GitHost;
use classroom_pull::types::{Commit, WorkingCopy};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted result for one repository
#[derive(Debug, Clone)]
pub enum RepoScript {
    /// Clone succeeds with this history (newest first)
    History(Vec<Commit>),
    /// Remote reports the repository missing
    NotFound,
    /// Transfer succeeds, checkout fails
    CheckoutFailed,
    /// Clone fails with these diagnostics
    Transport(String),
    /// Clone succeeds but history cannot be read
    HistoryError(String),
}

/// Call record for `clone_repository`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneCall {
    pub url: String,
    pub destination: PathBuf,
}

/// Mock git host
///
/// Repositories are scripted by name (`<assignment>-<student>`); unscripted
/// repositories do not exist. Successful clones create the destination
/// directory so path layout can be checked.
pub struct MockGitHost {
    scripts: Mutex<HashMap<String, RepoScript>>,
    histories: Mutex<HashMap<PathBuf, RepoScript>>,
    clone_delay: Option<Duration>,
    // Call tracking
    clone_calls: Mutex<Vec<CloneCall>>,
    list_calls: Mutex<Vec<PathBuf>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGitHost {
    /// Create a mock where no repository exists
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            histories: Mutex::new(HashMap::new()),
            clone_delay: None,
            clone_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Make every clone take `delay`
    pub fn with_clone_delay(mut self, delay: Duration) -> Self {
        self.clone_delay = Some(delay);
        self
    }

    /// Script the repository `repo` (e.g. `hw1-octocat`)
    pub fn set_repo(&self, repo: &str, script: RepoScript) {
        self.scripts
            .lock()
            .unwrap()
            .insert(repo.to_string(), script);
    }

    /// Script a repository with a history
    pub fn set_history(&self, repo: &str, commits: Vec<Commit>) {
        self.set_repo(repo, RepoScript::History(commits));
    }

    // === Call verification methods ===

    /// All `clone_repository` calls
    pub fn get_clone_calls(&self) -> Vec<CloneCall> {
        self.clone_calls.lock().unwrap().clone()
    }

    /// All `list_commits` calls
    pub fn get_list_calls(&self) -> Vec<PathBuf> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Highest number of clones in progress at once
    pub fn max_concurrent_clones(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Assert that a clone of `repo` was attempted
    pub fn assert_cloned(&self, repo: &str) {
        let calls = self.get_clone_calls();
        assert!(
            calls.iter().any(|c| repo_name(&c.url) == repo),
            "Expected clone of {repo} but got: {calls:?}"
        );
    }
}

fn repo_name(url: &str) -> &str {
    url.rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git")
}

#[async_trait]
impl GitHost for MockGitHost {
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
    ) -> std::result::Result<WorkingCopy, CloneError> {
        self.clone_calls.lock().unwrap().push(CloneCall {
            url: url.to_string(),
            destination: destination.to_path_buf(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.clone_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let script = self.scripts.lock().unwrap().get(repo_name(url)).cloned();
        let working_copy = WorkingCopy {
            path: destination.to_path_buf(),
        };

        match script {
            None | Some(RepoScript::NotFound) => Err(CloneError::NotFound),
            Some(RepoScript::CheckoutFailed) => {
                std::fs::create_dir_all(destination).unwrap();
                Err(CloneError::CheckoutFailed { working_copy })
            }
            Some(RepoScript::Transport(diagnostics)) => Err(CloneError::Transport(diagnostics)),
            Some(script) => {
                std::fs::create_dir_all(destination).unwrap();
                self.histories
                    .lock()
                    .unwrap()
                    .insert(destination.to_path_buf(), script);
                Ok(working_copy)
            }
        }
    }

    async fn list_commits(&self, working_copy: &WorkingCopy) -> Result<Vec<Commit>> {
        self.list_calls
            .lock()
            .unwrap()
            .push(working_copy.path.clone());

        match self.histories.lock().unwrap().get(&working_copy.path) {
            Some(RepoScript::History(commits)) => Ok(commits.clone()),
            Some(RepoScript::HistoryError(msg)) => Err(Error::Git(msg.clone())),
            _ => Err(Error::Git("not a cloned repository".to_string())),
        }
    }
}
