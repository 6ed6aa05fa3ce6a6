//! Clone orchestration: fan out one worker per student, join all, persist

use crate::error::Result;
use crate::host::{GitHost, RepoLocator};
use crate::ledger::{Ledger, LedgerStore, SharedLedger};
use crate::pull::worker::{CloneWorker, PullContext, WorkerOutcome};
use crate::pull::{NoopProgress, PullProgress, RunSummary};
use crate::types::{CloneAttempt, Organization, Roster, StudentInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Runs pulls for one organization
pub struct Puller {
    organization: Organization,
    clone_root: PathBuf,
    locator: RepoLocator,
    host: Arc<dyn GitHost>,
    store: LedgerStore,
    submission_logging: bool,
    progress: Arc<dyn PullProgress>,
}

impl Puller {
    /// Create a puller cloning below `<clone_output_path>/<organization name>`
    pub fn new(
        organization: Organization,
        clone_output_path: &Path,
        locator: RepoLocator,
        host: Arc<dyn GitHost>,
        store: LedgerStore,
    ) -> Self {
        let clone_root = clone_output_path.join(&organization.name);
        Self {
            organization,
            clone_root,
            locator,
            host,
            store,
            submission_logging: true,
            progress: Arc::new(NoopProgress),
        }
    }

    /// Report progress through `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn PullProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Enable or disable reading and writing the ledger file
    #[must_use]
    pub const fn with_submission_logging(mut self, enabled: bool) -> Self {
        self.submission_logging = enabled;
        self
    }

    /// Directory holding every clone of one run
    pub fn run_directory(&self, assignment: &str, timestamp: &str) -> PathBuf {
        self.clone_root.join(format!("{assignment}-{timestamp}"))
    }

    /// Pull every roster student's repository for `assignment`
    ///
    /// All workers are started before any is awaited, and the ledger is
    /// saved once after the last one finishes. Only a ledger load failure
    /// aborts the run; a save failure is reported in
    /// [`RunSummary::ledger_error`].
    pub async fn run_pull(
        &self,
        roster: &Roster,
        assignment: &str,
        timestamp: &str,
    ) -> Result<RunSummary> {
        let ledger = if self.submission_logging {
            self.store.load(&self.organization, assignment, timestamp)?
        } else {
            let mut ledger = Ledger::default();
            ledger.open_assignment(&self.organization, assignment, timestamp);
            ledger
        };

        let ctx = Arc::new(PullContext::new(
            Arc::clone(&self.host),
            SharedLedger::new(ledger, &self.organization.name, assignment),
            Arc::clone(&self.progress),
            self.locator.clone(),
        ));

        let run_dir = self.run_directory(assignment, timestamp);
        let attempts = roster
            .iter()
            .map(|(identifier, display_name)| {
                Ok(CloneAttempt {
                    identifier: identifier.clone(),
                    display_name: display_name.clone(),
                    clone_url: self.locator.clone_url(assignment, identifier)?,
                    display_url: self.locator.display_url(assignment, identifier)?,
                    destination: run_dir.join(clone_directory_name(
                        roster,
                        assignment,
                        identifier,
                        display_name,
                    )),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            organization = %self.organization.name,
            assignment,
            timestamp,
            students = attempts.len(),
            "starting pull"
        );
        self.progress.on_run_started(attempts.len(), &run_dir).await;

        let handles: Vec<_> = attempts
            .into_iter()
            .map(|attempt| {
                let info = StudentInfo {
                    display_name: attempt.display_name.clone(),
                    clone_url: attempt.display_url.clone(),
                };
                let identifier = attempt.identifier.clone();
                let worker = CloneWorker::new(attempt, Arc::clone(&ctx));
                (identifier, info, tokio::spawn(worker.run()))
            })
            .collect();

        for (identifier, info, handle) in handles {
            match handle.await {
                Ok(WorkerOutcome::Failed(_) | WorkerOutcome::NotSubmitted(_)) => {}
                Ok(WorkerOutcome::Submitted { num_commits }) => {
                    info!(student = %identifier, num_commits, "submission recorded");
                }
                Err(e) => {
                    error!(student = %identifier, error = %e, "clone worker aborted");
                    ctx.aggregate().record_not_cloned(&identifier, info);
                }
            }
        }

        let mut summary = ctx.aggregate().summary(roster.len());

        if self.submission_logging {
            if let Err(e) = self.store.save(&ctx.ledger().snapshot()) {
                error!(path = %self.store.path().display(), error = %e, "cannot save ledger");
                self.progress
                    .on_message(&format!(
                        "The submission ledger could not be saved to {}: {e}",
                        self.store.path().display()
                    ))
                    .await;
                summary.ledger_error = Some(e.to_string());
            }
        } else {
            self.progress
                .on_message("Submission logging is disabled; the ledger was not updated.")
                .await;
        }

        info!(
            cloned = summary.succeeded(),
            not_cloned = summary.not_cloned.len(),
            not_submitted = summary.not_submitted.len(),
            "pull complete"
        );
        Ok(summary)
    }
}

/// `<assignment>-<display name>`, with the identifier appended when another
/// student normalizes to the same display name
fn clone_directory_name(
    roster: &Roster,
    assignment: &str,
    identifier: &str,
    display_name: &str,
) -> String {
    let shared = roster
        .iter()
        .any(|(other, name)| other != identifier && name == display_name);
    if shared {
        format!("{assignment}-{display_name}-{identifier}")
    } else {
        format!("{assignment}-{display_name}")
    }
}
