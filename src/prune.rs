//! Removal of old clone directories
//!
//! Runs are written to `<clone_output_path>/<organization>/<assignment>-<timestamp>/`.
//! Pruning removes run directories created before a cutoff.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A run directory old enough to prune
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleDirectory {
    /// Directory path
    pub path: PathBuf,
    /// Creation time (modification time where unavailable)
    pub created: DateTime<Local>,
}

/// Parse a duration such as `90d`, `12h`, `30m`, or `90d12h`
pub fn parse_duration(input: &str) -> Result<Duration> {
    let mut total = Duration::zero();
    let mut digits = String::new();

    for c in input.trim().chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| Error::Parse(format!("expected a number before `{c}` in `{input}`")))?;
        digits.clear();

        let part = match c.to_ascii_lowercase() {
            'd' => Duration::try_days(value),
            'h' => Duration::try_hours(value),
            'm' => Duration::try_minutes(value),
            _ => {
                return Err(Error::Parse(format!(
                    "unknown unit `{c}` in `{input}` (use d, h, or m)"
                )));
            }
        };
        total += part.ok_or_else(|| Error::Parse(format!("duration `{input}` is too large")))?;
    }

    if !digits.is_empty() {
        return Err(Error::Parse(format!("missing unit after `{digits}` in `{input}`")));
    }
    if input.trim().is_empty() {
        return Err(Error::Parse("empty duration".to_string()));
    }

    Ok(total)
}

/// Find run directories under `clone_root` created before `cutoff`
///
/// Looks exactly two levels deep: organization directories, then runs.
pub fn find_stale_directories(
    clone_root: &Path,
    cutoff: DateTime<Local>,
) -> Result<Vec<StaleDirectory>> {
    if !clone_root.exists() {
        debug!(root = %clone_root.display(), "clone root does not exist");
        return Ok(Vec::new());
    }

    let mut stale = Vec::new();
    for org in fs::read_dir(clone_root)? {
        let org = org?;
        if !org.file_type()?.is_dir() {
            continue;
        }
        for run in fs::read_dir(org.path())? {
            let run = run?;
            if !run.file_type()?.is_dir() {
                continue;
            }
            let metadata = run.metadata()?;
            let created: DateTime<Local> =
                metadata.created().or_else(|_| metadata.modified())?.into();
            if created < cutoff {
                stale.push(StaleDirectory {
                    path: run.path(),
                    created,
                });
            }
        }
    }

    stale.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.path.cmp(&b.path)));
    Ok(stale)
}

/// Remove directories, returning the ones that could not be removed
pub fn remove_directories(directories: &[StaleDirectory]) -> Vec<(PathBuf, std::io::Error)> {
    directories
        .iter()
        .filter_map(|dir| match fs::remove_dir_all(&dir.path) {
            Ok(()) => {
                debug!(path = %dir.path.display(), "removed");
                None
            }
            Err(e) => {
                warn!(path = %dir.path.display(), error = %e, "cannot remove directory");
                Some((dir.path.clone(), e))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90d").unwrap(), Duration::days(90));
        assert_eq!(parse_duration("12h").unwrap(), Duration::hours(12));
        assert_eq!(
            parse_duration("90d12h").unwrap(),
            Duration::days(90) + Duration::hours(12)
        );
        assert_eq!(parse_duration("0m").unwrap(), Duration::zero());
        assert_eq!(parse_duration("1D2H3M").unwrap(), Duration::minutes(24 * 60 + 123));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("90").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("5w").is_err());
    }

    #[test]
    fn test_find_and_remove_stale_directories() {
        let root = TempDir::new().unwrap();
        let run = root.path().join("CS101").join("hw1-01-02-2024-10-00-00");
        fs::create_dir_all(run.join("hw1-Doe-John")).unwrap();
        fs::write(root.path().join("CS101").join("notes.txt"), "x").unwrap();

        let none = find_stale_directories(root.path(), Local::now() - Duration::days(1)).unwrap();
        assert!(none.is_empty());

        let all = find_stale_directories(root.path(), Local::now() + Duration::hours(1)).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].path, run);

        assert!(remove_directories(&all).is_empty());
        assert!(!run.exists());
    }

    #[test]
    fn test_missing_root_has_nothing_to_prune() {
        let stale = find_stale_directories(Path::new("/nonexistent/clones"), Local::now()).unwrap();
        assert!(stale.is_empty());
    }
}
