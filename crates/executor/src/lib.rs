//! # Executor Crate
//!
//! This crate provides the speculative `Ledger` that allocation rules propose transfers
//! against, and the `TransferExecutor` abstraction that turns committed proposals into
//! real pot movements.
//!
//! ## Architectural Principles
//!
//! - **Overlay, then defer:** Rules never talk to the bank. They read provisional
//!   balances from the `Ledger` and append proposals to it. The only place where real
//!   side effects happen is `Ledger::commit`, once per cycle.
//! - **Execution Abstraction:** The `TransferExecutor` trait lets the engine and the
//!   tests be agnostic about whether transfers hit the live API or an in-memory fake.
//!
//! ## Public API
//!
//! - `Ledger`: the per-cycle overlay of provisional balances and proposed transfers.
//! - `LabelScope`: the guard returned by `Ledger::with_label`.
//! - `TransferExecutor`: the core trait for executing a single transfer record.
//! - `LiveExecutor`: the implementation backed by a `BankClient`.
//! - `ExecutorError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod ledger;
pub mod transfer;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExecutorError;
pub use ledger::{CommitReport, LabelScope, Ledger, DEFAULT_LABEL};
pub use transfer::{LiveExecutor, TransferExecutor};
