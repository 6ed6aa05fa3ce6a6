//! Progress callback trait for interface-agnostic updates
//!
//! Clone workers report through this trait so the CLI (or any other
//! front end) can render per-student results as they arrive.

use crate::error::CloneError;
use crate::pull::NotSubmittedReason;
use crate::types::{CloneAttempt, Commit};
use async_trait::async_trait;
use std::path::Path;

/// Detail reported for a student without a new submission
#[derive(Debug, Clone)]
pub struct NotSubmittedReport {
    /// Why the clone does not count
    pub reason: NotSubmittedReason,
    /// Commits recorded at the last submission
    pub previous_commits: u64,
    /// Commits in the fresh clone
    pub current_commits: usize,
    /// Newest commit, if any
    pub newest: Option<Commit>,
}

/// Progress callback trait
///
/// Methods are called concurrently from many workers.
#[async_trait]
pub trait PullProgress: Send + Sync {
    /// Called once before any worker starts
    async fn on_run_started(&self, total: usize, destination: &Path);

    /// Called when a student's clone failed
    async fn on_clone_failed(&self, attempt: &CloneAttempt, error: &CloneError);

    /// Called when a clone holds no new submission
    async fn on_not_submitted(&self, attempt: &CloneAttempt, report: &NotSubmittedReport);

    /// Called when a clone holds a new submission
    async fn on_submitted(&self, attempt: &CloneAttempt, num_commits: usize);

    /// Called when a submission should be looked at by hand
    async fn on_review_flag(&self, attempt: &CloneAttempt, commit: &Commit);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl PullProgress for NoopProgress {
    async fn on_run_started(&self, _total: usize, _destination: &Path) {}
    async fn on_clone_failed(&self, _attempt: &CloneAttempt, _error: &CloneError) {}
    async fn on_not_submitted(&self, _attempt: &CloneAttempt, _report: &NotSubmittedReport) {}
    async fn on_submitted(&self, _attempt: &CloneAttempt, _num_commits: usize) {}
    async fn on_review_flag(&self, _attempt: &CloneAttempt, _commit: &Commit) {}
    async fn on_message(&self, _message: &str) {}
}
