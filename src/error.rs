//! Error types for classroom-pull

use crate::types::WorkingCopy;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Roster file missing or unreadable
    #[error("roster error: {0}")]
    Roster(String),

    /// Persisted submission ledger could not be parsed
    #[error("submission ledger {} is corrupt: {reason}", path.display())]
    LedgerCorrupt {
        /// Ledger file path
        path: PathBuf,
        /// Parser diagnostics
        reason: String,
    },

    /// Submission ledger could not be written after a run
    #[error("submission ledger {} was not saved: {reason}", path.display())]
    LedgerSave {
        /// Ledger file path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Local git repository error
    #[error("git error: {0}")]
    Git(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Parse error (durations, URLs)
    #[error("parse error: {0}")]
    Parse(String),

    /// Interactive prompt failed
    #[error("prompt error: {0}")]
    Prompt(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single student's repository could not be cloned
///
/// These never abort a run; the worker converts them into a "not cloned"
/// entry of the run aggregate.
#[derive(Debug, Clone, Error)]
pub enum CloneError {
    /// The remote reports that the repository does not exist
    #[error("the repository doesn't exist")]
    NotFound,

    /// The transfer succeeded but the working tree could not be checked out
    #[error("clone succeeded but checkout failed in {}", working_copy.path.display())]
    CheckoutFailed {
        /// The partially materialized working copy
        working_copy: WorkingCopy,
    },

    /// Network, authentication, or any other failure
    #[error("clone failed: {0}")]
    Transport(String),
}
