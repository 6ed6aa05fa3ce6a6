//! CLI progress callback with styled per-student lines and a spinner

use crate::cli::style::{arrow, bang, check, cross, spinner_style, Stylize};
use anstream::println;
use async_trait::async_trait;
use classroom_pull::error::CloneError;
use classroom_pull::pull::{NotSubmittedReport, PullProgress};
use classroom_pull::types::{CloneAttempt, Commit};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// CLI progress callback
///
/// Workers finish in any order; each result is printed above a spinner
/// that counts finished repositories.
pub struct CliProgress {
    bar: ProgressBar,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl CliProgress {
    /// Create a progress display (hidden until the run starts)
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        Self {
            bar,
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
        }
    }

    /// Remove the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn student(attempt: &CloneAttempt) -> String {
        format!("{} ({})", attempt.display_name, attempt.identifier)
    }

    /// Print above the spinner; hidden bars (no terminal) drop `println`
    fn line(&self, message: impl AsRef<str>) {
        if self.bar.is_hidden() {
            println!("{}", message.as_ref());
        } else {
            self.bar.println(message);
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst);
        self.bar
            .set_message(format!("Cloning repositories ({done}/{total})"));
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PullProgress for CliProgress {
    async fn on_run_started(&self, total: usize, _destination: &Path) {
        self.total.store(total, Ordering::SeqCst);
        self.bar
            .set_message(format!("Cloning repositories (0/{total})"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    async fn on_clone_failed(&self, attempt: &CloneAttempt, error: &CloneError) {
        let student = Self::student(attempt);
        match error {
            CloneError::NotFound => {
                self.line(format!(
                    "{} Skipping {} because the repository doesn't exist.",
                    cross(),
                    student.error().for_stdout()
                ));
            }
            CloneError::CheckoutFailed { working_copy } => {
                self.line(format!(
                    "{} Cloned {} but the checkout failed (illegal file names?).",
                    cross(),
                    student.error().for_stdout()
                ));
                self.line(format!(
                    "\tFix the working copy by hand: {}",
                    working_copy.path.display().accent()
                ));
            }
            CloneError::Transport(diagnostics) => {
                self.line(format!(
                    "{} Failed to clone {}:",
                    cross(),
                    student.error().for_stdout()
                ));
                for line in diagnostics.lines() {
                    self.line(format!("\t{}", line.muted()));
                }
            }
        }
        self.line(format!("\tClone URL: {}", attempt.display_url.muted()));
        self.tick();
    }

    async fn on_not_submitted(&self, attempt: &CloneAttempt, report: &NotSubmittedReport) {
        self.line(format!(
            "{} Cloned (WITH WARNINGS) {}: no submission at the time of pull ({}).",
            bang(),
            Self::student(attempt).warn().for_stdout(),
            report.reason
        ));
        self.line(format!(
            "\tCommits since last pull: {} {} {}",
            report.previous_commits,
            arrow(),
            report.current_commits
        ));
        if let Some(newest) = &report.newest {
            self.line("\tLatest commit:");
            self.line(format!("\t\tAuthor:  {}", newest.author.muted()));
            self.line(format!("\t\tMessage: {}", newest.summary().muted()));
        }
        self.line(format!("\tClone URL: {}", attempt.display_url.muted()));
        self.tick();
    }

    async fn on_submitted(&self, attempt: &CloneAttempt, num_commits: usize) {
        self.line(format!(
            "{} Cloned {} {}",
            check(),
            Self::student(attempt).emphasis(),
            format!("({num_commits} commits)").muted()
        ));
        self.tick();
    }

    async fn on_review_flag(&self, attempt: &CloneAttempt, commit: &Commit) {
        self.line(format!(
            "{} {} latest commit is \"{}\"; review the submission by hand.",
            bang(),
            Self::student(attempt).warn().for_stdout(),
            commit.summary()
        ));
    }

    async fn on_message(&self, message: &str) {
        self.line(message);
    }
}
