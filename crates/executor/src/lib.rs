//! # Executor Crate
//!
//! Assembles an ordered instruction list and its signers into one atomic
//! transaction, dry-runs it against the ledger and, when asked, commits it.
//!
//! - `Executor`: the seam the manager talks to.
//! - `LedgerExecutor`: the implementation over any `ledger_client::Ledger`.
//! - `ExecutionOutcome`: a simulation report, plus a receipt when committed.

pub mod error;
pub mod outcome;
pub mod pipeline;

pub use error::ExecutorError;
pub use outcome::ExecutionOutcome;
pub use pipeline::{Executor, LedgerExecutor};
