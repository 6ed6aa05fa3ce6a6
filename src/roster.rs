//! Roster import
//!
//! Classroom rosters are CSV files with a header row, the student's full
//! name in the first column and their git identifier in the second.

use crate::error::{Error, Result};
use crate::types::Roster;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

/// A roster record that was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Line number in the CSV file
    pub line: u64,
    /// Raw fields of the record
    pub fields: Vec<String>,
}

/// Result of importing a roster
#[derive(Debug, Clone, Default)]
pub struct RosterImport {
    /// Imported students
    pub students: Roster,
    /// Records without a git identifier
    pub skipped: Vec<SkippedRecord>,
    /// Identifiers that appeared more than once (last record wins)
    pub duplicates: Vec<String>,
}

/// Read a roster file
pub fn load_roster(path: &Path) -> Result<RosterImport> {
    let file = File::open(path)
        .map_err(|e| Error::Roster(format!("cannot open {}: {e}", path.display())))?;
    parse_roster(file)
}

/// Parse roster CSV contents
pub fn parse_roster<R: Read>(reader: R) -> Result<RosterImport> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut import = RosterImport::default();
    for record in csv.records() {
        let record = record.map_err(|e| Error::Roster(e.to_string()))?;
        let line = record.position().map_or(0, csv::Position::line);

        let identifier = record.get(1).unwrap_or_default();
        if identifier.is_empty() {
            warn!(line, "roster record has no git identifier");
            import.skipped.push(SkippedRecord {
                line,
                fields: record.iter().map(ToString::to_string).collect(),
            });
            continue;
        }

        let mut display_name = normalize_name(record.get(0).unwrap_or_default());
        if display_name.is_empty() {
            display_name = identifier.to_string();
        }

        if import
            .students
            .insert(identifier.to_string(), display_name)
            .is_some()
        {
            import.duplicates.push(identifier.to_string());
        }
    }

    Ok(import)
}

/// Turn a roster name into a directory-friendly display name
///
/// `"Doe, John Q."` becomes `"Doe-John"`: commas become dashes, only the
/// first space-separated token is kept, and dots/spaces are dropped.
pub fn normalize_name(raw: &str) -> String {
    static COMMA: OnceLock<Regex> = OnceLock::new();
    static DOTS: OnceLock<Regex> = OnceLock::new();

    let comma = COMMA.get_or_init(|| Regex::new(r", ?").expect("hardcoded regex is valid"));
    let dots = DOTS.get_or_init(|| Regex::new(r"[. ]").expect("hardcoded regex is valid"));

    let dashed = comma.replace_all(raw.trim(), "-");
    let first = dashed.split(' ').next().unwrap_or_default();
    dots.replace_all(first, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Doe, John Q."), "Doe-John");
        assert_eq!(normalize_name("Doe,Jane"), "Doe-Jane");
        assert_eq!(normalize_name("St. Clair"), "St");
        assert_eq!(normalize_name("J.R."), "JR");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_parse_roster() {
        let csv = "identifier,github_username\n\
                   \"Doe, John\",jdoe\n\
                   \"Smith, Ann\",asmith\n";
        let import = parse_roster(csv.as_bytes()).unwrap();

        assert_eq!(import.students.len(), 2);
        assert_eq!(import.students["jdoe"], "Doe-John");
        assert_eq!(import.students["asmith"], "Smith-Ann");
        assert!(import.skipped.is_empty());
    }

    #[test]
    fn test_records_without_identifier_are_skipped() {
        let csv = "identifier,github_username\n\
                   \"Doe, John\",\n\
                   \"Smith, Ann\",asmith\n";
        let import = parse_roster(csv.as_bytes()).unwrap();

        assert_eq!(import.students.len(), 1);
        assert_eq!(import.skipped.len(), 1);
        assert_eq!(import.skipped[0].line, 2);
        assert_eq!(import.skipped[0].fields[0], "Doe, John");
    }

    #[test]
    fn test_empty_name_falls_back_to_identifier() {
        let csv = "identifier,github_username\n,octocat\n";
        let import = parse_roster(csv.as_bytes()).unwrap();
        assert_eq!(import.students["octocat"], "octocat");
    }

    #[test]
    fn test_duplicate_identifiers_are_reported() {
        let csv = "identifier,github_username\nA,octocat\nB,octocat\n";
        let import = parse_roster(csv.as_bytes()).unwrap();
        assert_eq!(import.students["octocat"], "B");
        assert_eq!(import.duplicates, vec!["octocat".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_roster(Path::new("/nonexistent/roster.csv")).unwrap_err();
        assert!(matches!(err, Error::Roster(_)));
    }
}
