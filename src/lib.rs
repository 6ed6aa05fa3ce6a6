//! classroom-pull - bulk clone classroom assignment repositories
//!
//! Clones one repository per student for an assignment, decides who has
//! actually submitted since the last pull, and keeps that history in a
//! persisted submission ledger.

pub mod auth;
pub mod config;
pub mod error;
pub mod host;
pub mod ledger;
pub mod prune;
pub mod pull;
pub mod roster;
pub mod types;
