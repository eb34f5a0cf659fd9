use crate::pot::Pot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bank account whose pots are being managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub description: String,
    pub closed: bool,
}

/// Everything the engine needs to know about an account at the start of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: Account,
    /// Spendable balance. `None` when the bank did not report one.
    pub balance: Option<i64>,
    pub pots: Vec<Pot>,
    pub fetched_at: DateTime<Utc>,
}
