//! Clone pipeline
//!
//! One [`CloneWorker`] per roster student clones the assignment repository,
//! reads its history, and classifies it against the submission ledger.
//! [`Puller`] fans the workers out, waits for all of them, and saves the
//! ledger.

mod aggregate;
mod classify;
mod orchestrate;
mod progress;
mod worker;

pub use aggregate::{RunAggregate, RunSummary};
pub use classify::{
    BOT_AUTHORS, NotSubmittedReason, UPLOAD_MESSAGES, Verdict, classify, is_web_upload,
};
pub use orchestrate::Puller;
pub use progress::{NoopProgress, NotSubmittedReport, PullProgress};
pub use worker::{CloneWorker, PullContext, WorkerOutcome, WorkerState};
