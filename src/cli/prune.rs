//! Prune command - remove old clone directories

use crate::cli::style::{bullet, check, cross, Stylize};
use anstream::{eprintln, println};
use chrono::Local;
use classroom_pull::config::load_config;
use classroom_pull::error::{Error, Result};
use classroom_pull::prune::{find_stale_directories, parse_duration, remove_directories};
use dialoguer::Confirm;
use std::path::Path;

/// Run the prune command
pub fn run_prune(config_path: &Path, age: &str, yes: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let clone_root = config.clone_output_path();

    let now = Local::now();
    let cutoff = now - parse_duration(age)?;
    let stale = find_stale_directories(&clone_root, cutoff)?;

    if stale.is_empty() {
        println!("{}", format!("Nothing older than {age} in {}", clone_root.display()).muted());
        return Ok(());
    }

    println!("{}", "Directories to delete".emphasis());
    println!("Searched path             : {}", clone_root.display().accent());
    println!("Current timestamp         : {}", now.format("%Y-%m-%d %H:%M:%S"));
    println!("Deleting files older than : {}", cutoff.format("%Y-%m-%d %H:%M:%S"));
    println!("Difference                : {age}");
    println!();
    for dir in &stale {
        println!(
            "  {} {} {}",
            bullet(),
            dir.path.display(),
            format!("(created: {})", dir.created.format("%Y-%m-%d %H:%M:%S")).muted()
        );
    }
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete these {} directories?", stale.len()))
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        if !confirmed {
            println!("Not deleting the above directories.");
            return Ok(());
        }
    }

    let failures = remove_directories(&stale);
    for (path, err) in &failures {
        eprintln!("{} Cannot delete {}: {}", cross(), path.display(), err.error());
    }
    println!(
        "{} Deleted {}/{} directories",
        check(),
        stale.len() - failures.len(),
        stale.len()
    );
    Ok(())
}
