//! Test data factories for classroom-pull types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use classroom_pull::host::RepoLocator;
use classroom_pull::types::{Commit, Organization, Roster};

/// Access token used by test locators
pub const TEST_TOKEN: &str = "ghp_testtoken123";

/// Run timestamp used by tests
pub const TEST_TIMESTAMP: &str = "01-21-2024-21-01-45";

/// Bot account that seeds classroom repositories
pub const CLASSROOM_BOT: &str = "github-classroom[bot]";

/// Create a commit by `author`
pub fn make_commit(hash: &str, author: &str) -> Commit {
    make_commit_with_message(hash, author, &format!("Work on {hash}"))
}

/// Create a commit with a specific message
pub fn make_commit_with_message(hash: &str, author: &str, message: &str) -> Commit {
    Commit {
        hash: hash.to_string(),
        author: author.to_string(),
        message: message.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 21, 12, 0, 0).unwrap(),
    }
}

/// History (newest first) from `(hash, author)` pairs
pub fn history(commits: &[(&str, &str)]) -> Vec<Commit> {
    commits
        .iter()
        .map(|(hash, author)| make_commit(hash, author))
        .collect()
}

/// Freshly accepted assignment: only the bot's starter commit
pub fn starter_history() -> Vec<Commit> {
    history(&[("starter0", CLASSROOM_BOT)])
}

/// Test organization
pub fn test_org() -> Organization {
    Organization {
        name: "CS101 Fall".to_string(),
        identifier: "cs101-fall".to_string(),
    }
}

/// Locator for the test organization carrying [`TEST_TOKEN`]
pub fn test_locator() -> RepoLocator {
    RepoLocator::new("github.com", "cs101-fall", Some(TEST_TOKEN.to_string()))
}

/// Roster from `(identifier, display name)` pairs
pub fn roster(students: &[(&str, &str)]) -> Roster {
    students
        .iter()
        .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
        .collect()
}
