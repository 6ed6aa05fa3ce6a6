//! Run aggregate: per-run buckets of students that need attention

use crate::types::StudentInfo;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Buckets {
    not_cloned: BTreeMap<String, StudentInfo>,
    no_submission: BTreeMap<String, StudentInfo>,
}

/// Failure buckets filled concurrently by clone workers
///
/// Students in neither bucket were cloned and submitted.
#[derive(Debug, Default)]
pub struct RunAggregate {
    buckets: Mutex<Buckets>,
}

impl RunAggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a student whose repository could not be cloned
    pub fn record_not_cloned(&self, identifier: &str, info: StudentInfo) {
        self.lock().not_cloned.insert(identifier.to_string(), info);
    }

    /// Record a student without a new submission
    pub fn record_no_submission(&self, identifier: &str, info: StudentInfo) {
        self.lock().no_submission.insert(identifier.to_string(), info);
    }

    /// Summarize the run for a roster of `total_count` students
    pub fn summary(&self, total_count: usize) -> RunSummary {
        let buckets = self.lock();
        RunSummary {
            total_count,
            not_cloned: buckets.not_cloned.clone(),
            not_submitted: buckets.no_submission.clone(),
            ledger_error: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of one pull across the roster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Roster size
    pub total_count: usize,
    /// Students whose clone failed
    pub not_cloned: BTreeMap<String, StudentInfo>,
    /// Students cloned without a new submission
    pub not_submitted: BTreeMap<String, StudentInfo>,
    /// Why the ledger could not be saved, if it could not
    pub ledger_error: Option<String>,
}

impl RunSummary {
    /// Repositories cloned, with or without a new submission
    pub fn succeeded(&self) -> usize {
        self.total_count.saturating_sub(self.not_cloned.len())
    }

    /// Repositories with a new submission
    pub fn submitted(&self) -> usize {
        self.succeeded().saturating_sub(self.not_submitted.len())
    }
}
