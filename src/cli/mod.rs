//! CLI commands
//!
//! Command implementations for the `cpull` binary.

mod auth;
mod progress;
mod prune;
mod pull;
mod style;

pub use auth::{run_auth_setup, run_auth_test};
pub use prune::run_prune;
pub use pull::{run_pull, PullArgs};
