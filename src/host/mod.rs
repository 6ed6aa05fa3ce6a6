//! Repository hosting service
//!
//! The clone pipeline only needs two things from git: clone a repository
//! into a directory and list the commits of the resulting working copy.
//! [`GitHost`] abstracts both so the pipeline can run against the system
//! `git` binary or a test double.

mod git;
mod locator;

pub use git::{GitCliHost, classify_clone_failure};
pub use locator::{RepoLocator, redact, strip_credentials};

use crate::error::{CloneError, Result};
use crate::types::{Commit, WorkingCopy};
use async_trait::async_trait;
use std::path::Path;

/// Hosting service trait for clone and history operations
#[async_trait]
pub trait GitHost: Send + Sync {
    /// Clone `url` into `destination`
    async fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
    ) -> std::result::Result<WorkingCopy, CloneError>;

    /// Full commit history of a working copy, newest first (may be empty)
    async fn list_commits(&self, working_copy: &WorkingCopy) -> Result<Vec<Commit>>;
}
