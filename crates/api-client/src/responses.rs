use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// The response from `GET /accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub closed: bool,
}

/// The response from `GET /balance`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub balance: Option<i64>,
    #[serde(default)]
    pub total_balance: Option<i64>,
    #[serde(default)]
    pub currency: String,
}

/// The response from `GET /pots`.
#[derive(Debug, Clone, Deserialize)]
pub struct PotsResponse {
    pub pots: Vec<PotResponse>,
}

/// A single pot, as the bank describes it. The name still carries its configuration suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct PotResponse {
    pub id: String,
    pub name: String,
    pub balance: i64,
    #[serde(default)]
    pub currency: String,
    /// `"default"` for ordinary pots; anything else is a savings product.
    #[serde(rename = "type", default = "default_pot_type")]
    pub pot_type: String,
    #[serde(default)]
    pub goal_amount: Option<i64>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
}

fn default_pot_type() -> String {
    "default".to_string()
}

impl PotResponse {
    pub fn is_savings(&self) -> bool {
        self.pot_type != "default"
    }
}

/// The response from `GET /transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    /// Negative for money leaving the account (e.g. into a pot).
    pub amount: i64,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl TransactionResponse {
    /// The pot this transaction moved money to or from, if any.
    pub fn pot_id(&self) -> Option<&str> {
        self.metadata.get("pot_id").map(String::as_str)
    }
}

/// Represents an error response from the bank API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
