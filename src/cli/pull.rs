//! Pull command - clone every student's repository for an assignment

use crate::cli::progress::CliProgress;
use crate::cli::style::{bullet, check, hyperlink_url, spinner_style, Stream, Stylize};
use anstream::{eprintln, println};
use chrono::Local;
use classroom_pull::auth::{api_base_for_host, get_github_auth, test_github_auth};
use classroom_pull::config::{load_config, Config, OrganizationConfig};
use classroom_pull::error::{Error, Result};
use classroom_pull::host::{GitCliHost, RepoLocator};
use classroom_pull::ledger::LedgerStore;
use classroom_pull::pull::{Puller, RunSummary};
use classroom_pull::roster::{load_roster, RosterImport};
use classroom_pull::types::StudentInfo;
use dialoguer::{Input, Select};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Timestamp format of run directories (matches GitHub Classroom exports)
const RUN_TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H-%M-%S";

/// Options for the pull command
#[derive(Debug, Default)]
pub struct PullArgs {
    /// Organization name or identifier
    pub org: Option<String>,
    /// Assignment name
    pub assignment: Option<String>,
    /// Leave the submission ledger untouched
    pub no_log: bool,
    /// Skip validating the token against the API
    pub skip_auth_check: bool,
}

/// Run the pull command
pub async fn run_pull(config_path: &Path, args: PullArgs) -> Result<()> {
    println!("Importing config from {}...", config_path.display().accent());
    let config = load_config(config_path)?;

    let org = select_organization(&config, args.org.as_deref())?;
    let roster_path = config.roster_path(org);
    println!(
        "Pulling student roster for {} ({})...",
        org.name.emphasis(),
        org.identifier.muted()
    );
    let roster = load_roster(&roster_path)?;
    report_roster_problems(&roster, &roster_path);

    let assignment = match args.assignment {
        Some(name) => normalize_assignment(&name),
        None => prompt_assignment()?,
    };
    if assignment.is_empty() {
        return Err(Error::Config("assignment name must not be empty".to_string()));
    }

    let auth = get_github_auth(config.github_token.as_deref()).await?;
    if !args.skip_auth_check {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Validating access token...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        let login = test_github_auth(&auth, api_base_for_host(&config.host).as_deref()).await;
        spinner.finish_and_clear();
        println!("{} Authenticated as {}", check(), login?.accent());
    }

    let timestamp = Local::now().format(RUN_TIMESTAMP_FORMAT).to_string();
    let progress = Arc::new(CliProgress::new());
    let puller = Puller::new(
        org.organization(),
        &config.clone_output_path(),
        RepoLocator::new(&config.host, &org.identifier, Some(auth.token)),
        Arc::new(GitCliHost::new()),
        LedgerStore::new(config.ledger_path()),
    )
    .with_progress(progress.clone())
    .with_submission_logging(config.submission_logging && !args.no_log);

    let clone_message = format!(
        "Cloning to: `{}`...",
        puller.run_directory(&assignment, &timestamp).display()
    );
    let rule = "-".repeat(clone_message.chars().count());
    println!();
    println!("{rule}");
    println!("{clone_message}");
    println!("Timestamp pulled: {}", timestamp.accent());
    println!("{rule}");

    let summary = puller
        .run_pull(&roster.students, &assignment, &timestamp)
        .await;
    progress.finish();
    let summary = summary?;

    print_summary(&summary, &timestamp);

    match summary.ledger_error {
        Some(reason) => Err(Error::LedgerSave {
            path: config.ledger_path(),
            reason,
        }),
        None => Ok(()),
    }
}

fn select_organization<'a>(config: &'a Config, key: Option<&str>) -> Result<&'a OrganizationConfig> {
    if let Some(key) = key {
        return config
            .find_organization(key)
            .ok_or_else(|| Error::Config(format!("no organization named `{key}` in the config")));
    }

    if let [only] = config.organizations.as_slice() {
        return Ok(only);
    }

    let items: Vec<String> = config
        .organizations
        .iter()
        .map(|org| format!("{} ({})", org.name, org.identifier))
        .collect();
    let selection = Select::new()
        .with_prompt("Select an organization")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| Error::Prompt(e.to_string()))?;

    Ok(&config.organizations[selection])
}

fn prompt_assignment() -> Result<String> {
    let name: String = Input::new()
        .with_prompt("Assignment name")
        .interact_text()
        .map_err(|e| Error::Prompt(e.to_string()))?;
    Ok(normalize_assignment(&name))
}

/// Classroom repository prefixes never contain spaces
fn normalize_assignment(name: &str) -> String {
    name.trim().replace(' ', "-")
}

fn report_roster_problems(roster: &RosterImport, path: &Path) {
    for skipped in &roster.skipped {
        eprintln!(
            "{} Ignoring record (line {}) since it does not contain a git identifier: {}",
            "(!)".warn(),
            skipped.line,
            skipped.fields.join(",").muted()
        );
    }
    for identifier in &roster.duplicates {
        eprintln!(
            "{} Identifier {} appears more than once; using the last record",
            "(!)".warn(),
            identifier.accent()
        );
    }
    if !roster.skipped.is_empty() || !roster.duplicates.is_empty() {
        eprintln!("Check your classroom roster csv file at `{}`", path.display());
    }
}

fn print_students(students: &BTreeMap<String, StudentInfo>) {
    for (identifier, info) in students {
        println!("  {} {} ({})", bullet(), info.display_name, identifier.muted());
        println!(
            "      Clone URL: {}",
            hyperlink_url(Stream::Stdout, &info.clone_url)
        );
    }
}

fn print_summary(summary: &RunSummary, timestamp: &str) {
    println!();
    println!("{}", "STATISTICS".emphasis());
    println!(
        "{}",
        format!(
            "Successfully cloned {}/{} repositories.",
            summary.succeeded(),
            summary.total_count
        )
        .success()
    );
    println!();

    println!(
        "{}",
        format!(
            "`{}` repositories were not cloned (double check this!):",
            summary.not_cloned.len()
        )
        .error()
        .for_stdout()
    );
    print_students(&summary.not_cloned);
    println!();

    println!(
        "{}",
        format!(
            "`{}` of which did not have an active submission since time of pull ({timestamp}):",
            summary.not_submitted.len()
        )
        .warn()
        .for_stdout()
    );
    print_students(&summary.not_submitted);
    println!();
}
