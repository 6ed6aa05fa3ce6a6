//! cpull - bulk clone classroom assignment repositories
//!
//! CLI binary for pulling every student's repository of an assignment and
//! tracking who submitted since the last pull.

use anyhow::Result;
use clap::{Parser, Subcommand};
use classroom_pull::config::default_config_path;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "cpull")]
#[command(about = "Bulk-clone classroom assignment repositories and track submissions")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone every student's repository for an assignment
    Pull {
        /// Organization name or identifier (prompted when several are configured)
        #[arg(long)]
        org: Option<String>,

        /// Assignment name (prompted when omitted)
        #[arg(short, long)]
        assignment: Option<String>,

        /// Do not read or update the submission ledger
        #[arg(long)]
        no_log: bool,

        /// Do not validate the access token before cloning
        #[arg(long)]
        skip_auth_check: bool,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Delete clone directories older than a duration (e.g. 90d, 12h, 90d12h)
    Prune {
        /// Minimum age of directories to delete
        age: String,

        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        None => {
            // Default: interactive pull
            cli::run_pull(&config_path, cli::PullArgs::default()).await?;
        }
        Some(Commands::Pull {
            org,
            assignment,
            no_log,
            skip_auth_check,
        }) => {
            let args = cli::PullArgs {
                org,
                assignment,
                no_log,
                skip_auth_check,
            };
            cli::run_pull(&config_path, args).await?;
        }
        Some(Commands::Auth { action }) => match action {
            AuthAction::Test => cli::run_auth_test(&config_path).await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
        Some(Commands::Prune { age, yes }) => {
            cli::run_prune(&config_path, &age, yes)?;
        }
    }

    Ok(())
}
