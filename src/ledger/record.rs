//! Ledger record types

use crate::types::Organization;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Root of the persisted submission history
///
/// Serialized as the organization map itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    /// Organization name -> record
    pub organizations: BTreeMap<String, OrganizationRecord>,
}

/// Submission history of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationRecord {
    /// Organization login on the hosting service
    pub identifier: String,
    /// Assignment name -> record
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_history: BTreeMap<String, AssignmentRecord>,
}

/// Submission history of one assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentRecord {
    /// Timestamp of the most recent pull
    #[serde(default)]
    pub last_pulled: Option<String>,
    /// Student identifier -> last seen state
    #[serde(default, deserialize_with = "null_as_default")]
    pub submissions: BTreeMap<String, SubmissionEntry>,
}

/// Last seen commit state of one student's repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionEntry {
    /// Number of commits at the last recorded submission
    pub num_commits: u64,
    /// Newest commit hash at the last recorded submission
    #[serde(default)]
    pub commit_hash: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Ledger {
    /// Create the organization and assignment records if absent and stamp
    /// `last_pulled`. Existing submissions are never touched.
    pub fn open_assignment(
        &mut self,
        organization: &Organization,
        assignment: &str,
        pulled_at: &str,
    ) -> &mut AssignmentRecord {
        let record = self
            .organizations
            .entry(organization.name.clone())
            .or_insert_with(|| OrganizationRecord {
                identifier: organization.identifier.clone(),
                submission_history: BTreeMap::new(),
            })
            .submission_history
            .entry(assignment.to_string())
            .or_default();
        record.last_pulled = Some(pulled_at.to_string());
        record
    }

    /// Look up an assignment record
    pub fn assignment(&self, organization: &str, assignment: &str) -> Option<&AssignmentRecord> {
        self.organizations
            .get(organization)?
            .submission_history
            .get(assignment)
    }

    /// Look up a student's entry
    pub fn entry(
        &self,
        organization: &str,
        assignment: &str,
        student: &str,
    ) -> Option<&SubmissionEntry> {
        self.assignment(organization, assignment)?
            .submissions
            .get(student)
    }

    /// Get a student's entry, inserting a zero-valued one if absent
    ///
    /// Missing organization/assignment records are created on the way; an
    /// organization created here uses its name as identifier.
    pub fn ensure_entry(
        &mut self,
        organization: &str,
        assignment: &str,
        student: &str,
    ) -> &mut SubmissionEntry {
        self.organizations
            .entry(organization.to_string())
            .or_insert_with(|| OrganizationRecord {
                identifier: organization.to_string(),
                submission_history: BTreeMap::new(),
            })
            .submission_history
            .entry(assignment.to_string())
            .or_default()
            .submissions
            .entry(student.to_string())
            .or_default()
    }

    /// Overwrite a student's entry in place
    pub fn update_entry(
        &mut self,
        organization: &str,
        assignment: &str,
        student: &str,
        num_commits: u64,
        commit_hash: &str,
    ) {
        let entry = self.ensure_entry(organization, assignment, student);
        entry.num_commits = num_commits;
        entry.commit_hash = Some(commit_hash.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Organization {
        Organization {
            name: "CS101 Fall".to_string(),
            identifier: "cs101-fall".to_string(),
        }
    }

    #[test]
    fn test_open_assignment_creates_records() {
        let mut ledger = Ledger::default();
        ledger.open_assignment(&org(), "hw1", "01-02-2024-10-00-00");

        let record = &ledger.organizations["CS101 Fall"];
        assert_eq!(record.identifier, "cs101-fall");
        let hw1 = ledger.assignment("CS101 Fall", "hw1").unwrap();
        assert_eq!(hw1.last_pulled.as_deref(), Some("01-02-2024-10-00-00"));
        assert!(hw1.submissions.is_empty());
    }

    #[test]
    fn test_open_assignment_keeps_submissions() {
        let mut ledger = Ledger::default();
        ledger.open_assignment(&org(), "hw1", "t1");
        ledger.update_entry("CS101 Fall", "hw1", "octocat", 3, "abc");

        ledger.open_assignment(&org(), "hw1", "t2");

        let hw1 = ledger.assignment("CS101 Fall", "hw1").unwrap();
        assert_eq!(hw1.last_pulled.as_deref(), Some("t2"));
        assert_eq!(hw1.submissions["octocat"].num_commits, 3);
    }

    #[test]
    fn test_ensure_entry_is_zero_valued_and_not_duplicated() {
        let mut ledger = Ledger::default();
        ledger.open_assignment(&org(), "hw1", "t1");

        assert_eq!(
            *ledger.ensure_entry("CS101 Fall", "hw1", "octocat"),
            SubmissionEntry::default()
        );
        ledger.ensure_entry("CS101 Fall", "hw1", "octocat").num_commits = 2;
        ledger.ensure_entry("CS101 Fall", "hw1", "octocat");

        let hw1 = ledger.assignment("CS101 Fall", "hw1").unwrap();
        assert_eq!(hw1.submissions.len(), 1);
        assert_eq!(hw1.submissions["octocat"].num_commits, 2);
    }

    #[test]
    fn test_update_entry_overwrites() {
        let mut ledger = Ledger::default();
        ledger.update_entry("org", "hw1", "octocat", 3, "abc");
        ledger.update_entry("org", "hw1", "octocat", 5, "def");

        let entry = ledger.entry("org", "hw1", "octocat").unwrap();
        assert_eq!(entry.num_commits, 5);
        assert_eq!(entry.commit_hash.as_deref(), Some("def"));
    }

    #[test]
    fn test_null_collections_deserialize_as_empty() {
        let ledger: Ledger = serde_json::from_str(
            r#"{"o": {"identifier": "o", "submission_history": {"hw1": {"last_pulled": null, "submissions": null}}}}"#,
        )
        .unwrap();
        assert!(ledger.assignment("o", "hw1").unwrap().submissions.is_empty());
    }

    #[test]
    fn test_rejects_unknown_entry_fields() {
        let result: Result<Ledger, _> = serde_json::from_str(
            r#"{"o": {"identifier": "o", "submission_history": {"hw1": {"submissions": {"s": {"num_commits": 1, "commit_hash": "a", "extra": 1}}}}}}"#,
        );
        assert!(result.is_err());
    }
}
