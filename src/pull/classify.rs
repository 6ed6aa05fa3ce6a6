//! Submission classification
//!
//! Decides from a commit snapshot and the ledger's stored entry whether a
//! student has submitted new work since the last recorded pull.

use crate::ledger::SubmissionEntry;
use crate::types::Commit;
use std::fmt;

/// Authors that seed classroom repositories; their commits are not work
pub const BOT_AUTHORS: &[&str] = &["github-classroom[bot]"];

/// Commit messages the hosting web UI produces for uploaded files
pub const UPLOAD_MESSAGES: &[&str] = &["Add files via upload"];

/// Why a cloned repository does not count as a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotSubmittedReason {
    /// The repository has no commits
    NoCommits,
    /// The newest commit was made by a bot account
    BotOnly,
    /// The newest commit is the one recorded at the last pull
    Unchanged,
}

impl fmt::Display for NotSubmittedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCommits => write!(f, "no commits"),
            Self::BotOnly => write!(f, "only bot commits"),
            Self::Unchanged => write!(f, "no new commits since last pull"),
        }
    }
}

/// Classification result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// New work since the last recorded pull
    Submitted,
    /// Nothing new
    NotSubmitted(NotSubmittedReason),
}

/// Classify a snapshot (newest commit first) against the stored entry
pub fn classify(commits: &[Commit], stored: Option<&SubmissionEntry>) -> Verdict {
    let Some(newest) = commits.first() else {
        return Verdict::NotSubmitted(NotSubmittedReason::NoCommits);
    };

    if BOT_AUTHORS.contains(&newest.author.as_str()) {
        return Verdict::NotSubmitted(NotSubmittedReason::BotOnly);
    }

    if stored.and_then(|entry| entry.commit_hash.as_deref()) == Some(newest.hash.as_str()) {
        return Verdict::NotSubmitted(NotSubmittedReason::Unchanged);
    }

    Verdict::Submitted
}

/// Whether a commit was made by uploading files through the web UI
pub fn is_web_upload(commit: &Commit) -> bool {
    UPLOAD_MESSAGES.contains(&commit.summary())
}
