//! Submission ledger
//!
//! Persisted submission history across runs, keyed by
//! organization / assignment / student. Loaded once at the start of a run,
//! mutated by clone workers through [`SharedLedger`], and written back once
//! after every worker has finished.

mod record;
mod shared;
mod store;

pub use record::{AssignmentRecord, Ledger, OrganizationRecord, SubmissionEntry};
pub use shared::SharedLedger;
pub use store::LedgerStore;
