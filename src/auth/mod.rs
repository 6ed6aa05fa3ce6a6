//! Authentication for GitHub
//!
//! Supports a token from the config file, environment variables, and the
//! `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, api_base_for_host, get_github_auth, test_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the configuration file
    Config,
    /// Token from environment variable
    EnvVar,
    /// Token from the gh CLI
    Cli,
}
