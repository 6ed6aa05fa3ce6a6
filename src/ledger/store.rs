//! Ledger persistence

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::types::Organization;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads and writes the ledger file
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger as stored. A missing or empty file is an empty ledger.
    pub fn read(&self) -> Result<Ledger> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no ledger file yet");
                return Ok(Ledger::default());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Ledger::default());
        }

        serde_json::from_str(&contents).map_err(|e| Error::LedgerCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Load the ledger for a run
    ///
    /// Creates the organization and assignment records if absent and stamps
    /// the assignment's `last_pulled` with `pulled_at`.
    pub fn load(
        &self,
        organization: &Organization,
        assignment: &str,
        pulled_at: &str,
    ) -> Result<Ledger> {
        let mut ledger = self.read()?;
        let record = ledger.open_assignment(organization, assignment, pulled_at);
        debug!(
            organization = %organization.name,
            assignment,
            students = record.submissions.len(),
            "loaded submission ledger"
        );
        Ok(ledger)
    }

    /// Write the whole ledger back
    ///
    /// The new contents go to a sibling temp file which is then renamed over
    /// the ledger, so readers never observe a partial write.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(ledger)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        info!(path = %self.path.display(), "saved submission ledger");
        Ok(())
    }
}
