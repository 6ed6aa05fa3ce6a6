//! Auth command - test and explain authentication

use crate::cli::style::{check, Stylize};
use anstream::println;
use classroom_pull::auth::{api_base_for_host, get_github_auth, test_github_auth};
use classroom_pull::config::load_config;
use classroom_pull::error::Result;
use std::path::Path;

/// Run the auth test command
///
/// Uses the config file's token and host when the file exists.
pub async fn run_auth_test(config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        Some(load_config(config_path)?)
    } else {
        None
    };
    let token = config.as_ref().and_then(|c| c.github_token.as_deref());
    let api_base = config
        .as_ref()
        .and_then(|c| api_base_for_host(&c.host));

    println!("Testing GitHub authentication...");
    let auth = get_github_auth(token).await?;
    let login = test_github_auth(&auth, api_base.as_deref()).await?;
    println!("{} Authenticated as: {}", check(), login.accent());
    println!("Token source: {}", format!("{:?}", auth.source).muted());
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "GitHub Authentication Setup".emphasis());
    println!("===========================");
    println!();
    println!("The token needs the `repo` scope and access to the classroom organizations.");
    println!();
    println!("Option 1: Config file");
    println!("  Set github_token = \"ghp_...\" in config.toml");
    println!();
    println!("Option 2: Environment variable");
    println!("  Set GITHUB_TOKEN or GH_TOKEN");
    println!();
    println!("Option 3: GitHub CLI");
    println!("  Install: https://cli.github.com/");
    println!("  Run: gh auth login");
    println!();
    println!("For GitHub Enterprise:");
    println!("  Set host = \"<your instance hostname>\" in config.toml");
}
