//! Configuration file
//!
//! TOML file describing where clones go, where the submission ledger lives,
//! and which classroom organizations (with their rosters) can be pulled.
//! Relative paths resolve against the directory holding the file.

use crate::error::{Error, Result};
use crate::types::Organization;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "classroom-pull";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_LEDGER_FILE: &str = "submissions.json";
const DEFAULT_HOST: &str = "github.com";

/// Parsed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Personal access token; falls back to the environment and `gh`
    #[serde(default)]
    pub github_token: Option<String>,
    /// Root directory for clones
    #[serde(default)]
    pub clone_output_path: PathBuf,
    /// Whether the submission ledger is read and written
    #[serde(default = "default_true")]
    pub submission_logging: bool,
    /// Ledger file; defaults to `submissions.json` next to the config file
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
    /// Hosting service hostname
    #[serde(default = "default_host")]
    pub host: String,
    /// Organizations that can be pulled
    #[serde(default)]
    pub organizations: Vec<OrganizationConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One configured organization
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// Human readable name
    pub name: String,
    /// Organization login on the hosting service
    pub identifier: String,
    /// CSV roster of the organization's students
    pub roster_path: PathBuf,
}

impl OrganizationConfig {
    /// Name and identifier
    pub fn organization(&self) -> Organization {
        Organization {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Where to look for the config file when none is given
///
/// `./config/config.toml` if it exists, otherwise the user config directory.
pub fn default_config_path() -> PathBuf {
    let local = Path::new("config").join(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    dirs::config_dir().map_or(local, |dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load and validate the config file
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read config file {}: {e}", path.display()))
    })?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Config::from_toml_str(&contents, &base_dir)
}

impl Config {
    /// Parse and validate config contents, resolving paths against `base_dir`
    pub fn from_toml_str(contents: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        config.base_dir = base_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Check that every required setting is present
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.clone_output_path.as_os_str().is_empty() {
            problems.push("`clone_output_path` must be set".to_string());
        }
        if self.host.trim().is_empty() {
            problems.push("`host` must not be empty".to_string());
        }
        if self.organizations.is_empty() {
            problems.push("at least one `[[organizations]]` entry is required".to_string());
        }
        for (i, org) in self.organizations.iter().enumerate() {
            if org.name.trim().is_empty() {
                problems.push(format!("organization #{} has no `name`", i + 1));
            }
            if org.identifier.trim().is_empty() {
                problems.push(format!("organization #{} has no `identifier`", i + 1));
            }
            if org.roster_path.as_os_str().is_empty() {
                problems.push(format!("organization #{} has no `roster_path`", i + 1));
            }
            if self.organizations[..i].iter().any(|o| o.name == org.name) {
                problems.push(format!("organization name `{}` is used twice", org.name));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }

    /// Clone root, resolved
    pub fn clone_output_path(&self) -> PathBuf {
        self.resolve(&self.clone_output_path)
    }

    /// Ledger file, resolved
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_path.as_ref().map_or_else(
            || self.base_dir.join(DEFAULT_LEDGER_FILE),
            |path| self.resolve(path),
        )
    }

    /// Roster file of an organization, resolved
    pub fn roster_path(&self, organization: &OrganizationConfig) -> PathBuf {
        self.resolve(&organization.roster_path)
    }

    /// Find an organization by name or identifier
    pub fn find_organization(&self, key: &str) -> Option<&OrganizationConfig> {
        self.organizations
            .iter()
            .find(|org| org.name == key || org.identifier == key)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
