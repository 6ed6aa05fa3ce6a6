//! Progress callback that records every event
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use classroom_pull::error::CloneError;
use classroom_pull::pull::{NotSubmittedReason, NotSubmittedReport, PullProgress};
use classroom_pull::types::{CloneAttempt, Commit};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Progress callback that keeps everything it is told
#[derive(Default)]
pub struct RecordingProgress {
    pub started: Mutex<Vec<(usize, PathBuf)>>,
    pub failed: Mutex<Vec<(String, CloneError)>>,
    pub not_submitted: Mutex<Vec<(String, NotSubmittedReason, u64, usize)>>,
    pub submitted: Mutex<Vec<(String, usize)>>,
    pub flagged: Mutex<Vec<(String, String)>>,
    pub messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// Failure recorded for `student`, if any
    pub fn failure_for(&self, student: &str) -> Option<CloneError> {
        self.failed
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == student)
            .map(|(_, e)| e.clone())
    }

    /// Not-submitted reason recorded for `student`, if any
    pub fn reason_for(&self, student: &str) -> Option<NotSubmittedReason> {
        self.not_submitted
            .lock()
            .unwrap()
            .iter()
            .find(|(id, ..)| id == student)
            .map(|(_, reason, ..)| *reason)
    }
}

#[async_trait]
impl PullProgress for RecordingProgress {
    async fn on_run_started(&self, total: usize, destination: &Path) {
        self.started
            .lock()
            .unwrap()
            .push((total, destination.to_path_buf()));
    }

    async fn on_clone_failed(&self, attempt: &CloneAttempt, error: &CloneError) {
        self.failed
            .lock()
            .unwrap()
            .push((attempt.identifier.clone(), error.clone()));
    }

    async fn on_not_submitted(&self, attempt: &CloneAttempt, report: &NotSubmittedReport) {
        self.not_submitted.lock().unwrap().push((
            attempt.identifier.clone(),
            report.reason,
            report.previous_commits,
            report.current_commits,
        ));
    }

    async fn on_submitted(&self, attempt: &CloneAttempt, num_commits: usize) {
        self.submitted
            .lock()
            .unwrap()
            .push((attempt.identifier.clone(), num_commits));
    }

    async fn on_review_flag(&self, attempt: &CloneAttempt, commit: &Commit) {
        self.flagged
            .lock()
            .unwrap()
            .push((attempt.identifier.clone(), commit.summary().to_string()));
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
