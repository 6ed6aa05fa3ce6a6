//! Clone worker: one student's clone, classification, and report
//!
//! ```text
//! Pending -> Cloning -> Failed
//!                    -> Cloned -> Classifying -> Submitted
//!                                             -> NotSubmitted
//! ```

use crate::error::CloneError;
use crate::host::{GitHost, RepoLocator};
use crate::ledger::SharedLedger;
use crate::pull::classify::{classify, is_web_upload};
use crate::pull::{NotSubmittedReason, NotSubmittedReport, PullProgress, RunAggregate, Verdict};
use crate::types::{CloneAttempt, StudentInfo};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// State shared by every worker of one run
pub struct PullContext {
    pub(crate) host: Arc<dyn GitHost>,
    pub(crate) ledger: SharedLedger,
    pub(crate) aggregate: RunAggregate,
    pub(crate) progress: Arc<dyn PullProgress>,
    pub(crate) locator: RepoLocator,
}

impl PullContext {
    /// Create a context for one run
    pub fn new(
        host: Arc<dyn GitHost>,
        ledger: SharedLedger,
        progress: Arc<dyn PullProgress>,
        locator: RepoLocator,
    ) -> Self {
        Self {
            host,
            ledger,
            aggregate: RunAggregate::new(),
            progress,
            locator,
        }
    }

    /// The run's ledger
    pub const fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// The run's failure buckets
    pub const fn aggregate(&self) -> &RunAggregate {
        &self.aggregate
    }
}

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Not started
    Pending,
    /// Clone in progress
    Cloning,
    /// Clone failed (terminal)
    Failed,
    /// Clone succeeded, history read
    Cloned,
    /// Comparing history with the ledger
    Classifying,
    /// New submission recorded (terminal)
    Submitted,
    /// No new submission (terminal)
    NotSubmitted,
}

impl WorkerState {
    /// Whether the worker is done
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Submitted | Self::NotSubmitted)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Cloning => "cloning",
            Self::Failed => "failed",
            Self::Cloned => "cloned",
            Self::Classifying => "classifying",
            Self::Submitted => "submitted",
            Self::NotSubmitted => "not submitted",
        };
        f.write_str(name)
    }
}

/// Terminal result of a worker
#[derive(Debug, Clone)]
pub enum WorkerOutcome {
    /// Clone failed
    Failed(CloneError),
    /// New submission with this many commits
    Submitted {
        /// Commits in the clone
        num_commits: usize,
    },
    /// Cloned without a new submission
    NotSubmitted(NotSubmittedReason),
}

impl WorkerOutcome {
    /// Terminal state matching this outcome
    pub const fn state(&self) -> WorkerState {
        match self {
            Self::Failed(_) => WorkerState::Failed,
            Self::Submitted { .. } => WorkerState::Submitted,
            Self::NotSubmitted(_) => WorkerState::NotSubmitted,
        }
    }
}

/// Clones and classifies one student's repository
pub struct CloneWorker {
    attempt: CloneAttempt,
    ctx: Arc<PullContext>,
    state: WorkerState,
}

impl CloneWorker {
    /// Create a pending worker
    pub const fn new(attempt: CloneAttempt, ctx: Arc<PullContext>) -> Self {
        Self {
            attempt,
            ctx,
            state: WorkerState::Pending,
        }
    }

    /// Current state
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Run to a terminal state
    ///
    /// Every failure is absorbed here: it ends up in the run aggregate and
    /// never propagates to the orchestrator.
    #[instrument(name = "clone_worker", skip_all, fields(student = %self.attempt.identifier))]
    pub async fn run(mut self) -> WorkerOutcome {
        self.transition(WorkerState::Cloning);

        let cloned = self
            .ctx
            .host
            .clone_repository(&self.attempt.clone_url, &self.attempt.destination)
            .await;
        let working_copy = match cloned {
            Ok(working_copy) => working_copy,
            Err(e) => return self.fail(e).await,
        };

        let commits = match self.ctx.host.list_commits(&working_copy).await {
            Ok(commits) => commits,
            Err(e) => {
                return self
                    .fail(CloneError::Transport(format!("cannot read history: {e}")))
                    .await;
            }
        };
        self.transition(WorkerState::Cloned);

        self.transition(WorkerState::Classifying);
        let (verdict, previous_commits) =
            self.ctx.ledger.with_entry(&self.attempt.identifier, |entry| {
                let previous_commits = entry.num_commits;
                let verdict = classify(&commits, Some(&*entry));
                if let (Verdict::Submitted, Some(newest)) = (verdict, commits.first()) {
                    entry.num_commits = commits.len() as u64;
                    entry.commit_hash = Some(newest.hash.clone());
                }
                (verdict, previous_commits)
            });

        let newest = match (verdict, commits.first()) {
            (Verdict::Submitted, Some(newest)) => newest,
            (Verdict::NotSubmitted(reason), newest) => {
                let report = NotSubmittedReport {
                    reason,
                    previous_commits,
                    current_commits: commits.len(),
                    newest: newest.cloned(),
                };
                return self.not_submitted(&report).await;
            }
            // classify never accepts an empty history
            (Verdict::Submitted, None) => {
                let report = NotSubmittedReport {
                    reason: NotSubmittedReason::NoCommits,
                    previous_commits,
                    current_commits: 0,
                    newest: None,
                };
                return self.not_submitted(&report).await;
            }
        };

        if is_web_upload(newest) {
            self.ctx.progress.on_review_flag(&self.attempt, newest).await;
        }
        self.ctx
            .progress
            .on_submitted(&self.attempt, commits.len())
            .await;

        self.transition(WorkerState::Submitted);
        WorkerOutcome::Submitted {
            num_commits: commits.len(),
        }
    }

    async fn fail(mut self, error: CloneError) -> WorkerOutcome {
        let error = match error {
            CloneError::Transport(diagnostics) => {
                CloneError::Transport(self.ctx.locator.redact(&diagnostics))
            }
            other => other,
        };

        warn!(student = %self.attempt.identifier, error = %error, "clone failed");
        self.ctx
            .aggregate
            .record_not_cloned(&self.attempt.identifier, self.student_info());
        self.ctx.progress.on_clone_failed(&self.attempt, &error).await;

        self.transition(WorkerState::Failed);
        WorkerOutcome::Failed(error)
    }

    async fn not_submitted(mut self, report: &NotSubmittedReport) -> WorkerOutcome {
        self.ctx
            .aggregate
            .record_no_submission(&self.attempt.identifier, self.student_info());
        self.ctx
            .progress
            .on_not_submitted(&self.attempt, report)
            .await;

        self.transition(WorkerState::NotSubmitted);
        WorkerOutcome::NotSubmitted(report.reason)
    }

    fn student_info(&self) -> StudentInfo {
        StudentInfo {
            display_name: self.attempt.display_name.clone(),
            clone_url: self.attempt.display_url.clone(),
        }
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(
            student = %self.attempt.identifier,
            from = %self.state,
            to = %next,
            "worker state change"
        );
        self.state = next;
    }
}
