//! # Core Types
//!
//! The shared vocabulary of the pot rebalancer: pots and their resolved rule
//! parameters, account snapshots, proposed transfer records and rule identifiers.
//!
//! This crate has no knowledge of the bank API, the ledger or the rules. It only
//! defines plain value types that every other crate passes around.

pub mod account;
pub mod enums;
pub mod error;
pub mod pot;
pub mod transfer;

// Re-export the core types to provide a clean public API.
pub use account::{Account, AccountSnapshot};
pub use enums::RuleId;
pub use error::CoreError;
pub use pot::{Pot, PotActivity, PotConfig, PotId};
pub use transfer::{Endpoint, Transfer};
