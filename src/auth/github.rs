//! GitHub authentication

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication
///
/// Priority:
/// 1. `github_token` from the config file
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
/// 4. gh CLI (`gh auth token`)
pub async fn get_github_auth(config_token: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = config_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Config,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.trim().is_empty() {
                return Ok(GitHubAuthConfig {
                    token: token.trim().to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    if let Some(token) = get_gh_cli_token().await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No GitHub authentication found. Set `github_token` in the config, set GITHUB_TOKEN, or run `gh auth login`".to_string(),
    ))
}

async fn get_gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

/// Test GitHub authentication, returning the authenticated login
///
/// `api_base` overrides the API endpoint (GitHub Enterprise, tests).
pub async fn test_github_auth(config: &GitHubAuthConfig, api_base: Option<&str>) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder().personal_token(config.token.clone());
    if let Some(base) = api_base {
        builder = builder
            .base_uri(base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }
    let octocrab = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;

    Ok(user.login)
}

/// API endpoint for a hosting service hostname
///
/// `github.com` uses the public API; anything else is treated as GitHub
/// Enterprise.
pub fn api_base_for_host(host: &str) -> Option<String> {
    if host == "github.com" {
        None
    } else {
        Some(format!("https://{host}/api/v3"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_config_token_wins() {
        let auth = get_github_auth(Some("  ghp_config  ")).await.unwrap();
        assert_eq!(auth.token, "ghp_config");
        assert_eq!(auth.source, AuthSource::Config);
    }

    #[tokio::test]
    #[serial]
    #[allow(unsafe_code)]
    async fn test_env_token_used_without_config() {
        // SAFETY: serialized with every other env-touching test
        unsafe {
            env::set_var("GITHUB_TOKEN", "ghp_env");
        }
        let auth = get_github_auth(Some("")).await.unwrap();
        unsafe {
            env::remove_var("GITHUB_TOKEN");
        }

        assert_eq!(auth.token, "ghp_env");
        assert_eq!(auth.source, AuthSource::EnvVar);
    }

    #[test]
    fn test_api_base_for_host() {
        assert_eq!(api_base_for_host("github.com"), None);
        assert_eq!(
            api_base_for_host("github.example.edu").as_deref(),
            Some("https://github.example.edu/api/v3")
        );
    }
}
