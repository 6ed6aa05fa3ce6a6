//! Ledger shared between concurrent clone workers

use crate::ledger::{Ledger, SubmissionEntry};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A run's ledger behind a single lock
///
/// Scoped to one organization and assignment; workers only see the
/// per-student operations, never the ledger itself.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
    organization: String,
    assignment: String,
}

impl SharedLedger {
    /// Wrap a loaded ledger for one organization/assignment
    pub fn new(ledger: Ledger, organization: &str, assignment: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
            organization: organization.to_string(),
            assignment: assignment.to_string(),
        }
    }

    /// Run `f` on the student's entry under the ledger lock
    ///
    /// The entry is created zero-valued on first sight, so reading,
    /// deciding, and updating it happen in one critical section.
    pub fn with_entry<R>(&self, student: &str, f: impl FnOnce(&mut SubmissionEntry) -> R) -> R {
        let mut ledger = self.lock();
        f(ledger.ensure_entry(&self.organization, &self.assignment, student))
    }

    /// The student's stored entry, if any
    pub fn entry(&self, student: &str) -> Option<SubmissionEntry> {
        self.lock()
            .entry(&self.organization, &self.assignment, student)
            .cloned()
    }

    /// Copy of the whole ledger, for saving
    pub fn snapshot(&self) -> Ledger {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // Every critical section leaves the ledger consistent, so a panic in
        // another worker does not invalidate it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_entry_is_created_once() {
        let shared = SharedLedger::new(Ledger::default(), "org", "hw1");
        assert!(shared.entry("octocat").is_none());

        let seen = shared.with_entry("octocat", |entry| entry.clone());
        assert_eq!(seen, SubmissionEntry::default());
        shared.with_entry("octocat", |entry| entry.num_commits = 4);
        assert_eq!(shared.entry("octocat").unwrap().num_commits, 4);

        let ledger = shared.snapshot();
        assert_eq!(ledger.assignment("org", "hw1").unwrap().submissions.len(), 1);
    }

    #[test]
    fn test_concurrent_disjoint_updates_are_not_lost() {
        let shared = SharedLedger::new(Ledger::default(), "org", "hw1");

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with_entry(&format!("student-{i}"), |entry| {
                        entry.num_commits = i;
                        entry.commit_hash = Some(format!("hash-{i}"));
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ledger = shared.snapshot();
        let submissions = &ledger.assignment("org", "hw1").unwrap().submissions;
        assert_eq!(submissions.len(), 64);
        for i in 0..64 {
            let entry = &submissions[&format!("student-{i}")];
            assert_eq!(entry.num_commits, i);
            assert_eq!(entry.commit_hash, Some(format!("hash-{i}")));
        }
    }

    #[test]
    fn test_concurrent_updates_of_one_entry_are_serialized() {
        let shared = SharedLedger::new(Ledger::default(), "org", "hw1");

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with_entry("octocat", |entry| entry.num_commits += 1);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.entry("octocat").unwrap().num_commits, 32);
    }
}
