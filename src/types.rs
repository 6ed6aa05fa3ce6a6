//! Core types for classroom-pull

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Students taking part in a run: git identifier -> display name
pub type Roster = BTreeMap<String, String>;

/// A classroom organization on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Human readable name, used for the clone directory and ledger key
    pub name: String,
    /// Organization login on the hosting service
    pub identifier: String,
}

/// A commit from a cloned repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash (hex)
    pub hash: String,
    /// Author name
    pub author: String,
    /// Full commit message
    pub message: String,
    /// When the commit was made
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// A local checkout produced by a clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    /// Root of the working tree
    pub path: PathBuf,
}

/// One student's clone for one run
#[derive(Debug, Clone)]
pub struct CloneAttempt {
    /// Student's git identifier
    pub identifier: String,
    /// Student's display name
    pub display_name: String,
    /// Clone URL including credentials; never shown to the operator
    pub clone_url: String,
    /// Clone URL with credentials stripped
    pub display_url: String,
    /// Where the working copy is created
    pub destination: PathBuf,
}

/// Per-student detail kept in the run summary buckets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    /// Student's display name
    pub display_name: String,
    /// Clone URL with credentials stripped
    pub clone_url: String,
}
