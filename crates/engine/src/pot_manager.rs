use crate::error::EngineError;
use api_client::{ApiError, BankClient, PotResponse, TransactionResponse};
use chrono::Utc;
use configuration::{parse_pot_name, EngineConfig};
use core_types::{Account, AccountSnapshot, Pot, PotActivity, PotId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The snapshot provider: turns the bank's view of an account into `Pot` values.
///
/// Deleted pots are dropped, every pot name is resolved into its configuration, and
/// each pot carries the money that moved in and out of it during the transaction window.
pub struct PotManager {
    api_client: Arc<dyn BankClient>,
    retry_attempts: u32,
    retry_delay: Duration,
    window: chrono::Duration,
}

impl PotManager {
    pub fn new(api_client: Arc<dyn BankClient>, config: &EngineConfig) -> Self {
        Self {
            api_client,
            retry_attempts: config.fetch_retry_attempts.max(1),
            retry_delay: config.fetch_retry_delay(),
            window: chrono::Duration::hours(config.transaction_window_hours),
        }
    }

    /// Fetches the account's balance, pots and recent activity.
    pub async fn snapshot(&self, account: &Account) -> Result<AccountSnapshot, EngineError> {
        let account_id = account.id.as_str();
        let since = Utc::now() - self.window;

        let client = self.api_client.as_ref();

        let balance = self
            .with_retry("balance", move || client.get_balance(account_id))
            .await?;
        let pots = self
            .with_retry("pots", move || client.list_pots(account_id))
            .await?;
        let transactions = self
            .with_retry("transactions", move || client.list_transactions(account_id, since))
            .await?;

        let activity = collect_activity(&transactions);
        let pots: Vec<Pot> = pots
            .iter()
            .filter(|p| !p.deleted)
            .map(|p| build_pot(p, activity.get(p.id.as_str()).copied().unwrap_or_default()))
            .collect();

        tracing::debug!(account_id, pots = pots.len(), ?balance, "Fetched account snapshot.");
        Ok(AccountSnapshot {
            account: account.clone(),
            balance,
            pots,
            fetched_at: Utc::now(),
        })
    }

    /// Retries `op` with a fixed delay, up to the configured number of attempts.
    async fn with_retry<T, F, Fut>(&self, what: &'static str, op: F) -> Result<T, EngineError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.retry_attempts => {
                    return Err(EngineError::FetchFailed {
                        what,
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(what, attempt, error = %e, "Fetch failed; retrying.");
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}

/// Builds a pot from the bank's description, resolving its name into configuration.
pub fn build_pot(response: &PotResponse, activity: PotActivity) -> Pot {
    let resolved = parse_pot_name(&response.name);
    Pot {
        id: PotId::new(response.id.as_str()),
        name: resolved.name,
        balance: response.balance,
        goal: response.goal_amount.unwrap_or(0),
        locked: response.locked,
        is_savings: response.is_savings(),
        config: resolved.config,
        activity,
    }
}

/// Sums pot transfers per pot id.
///
/// A negative account transaction moved money into the pot (a credit); a positive one
/// moved money out of it (a debit).
pub fn collect_activity(transactions: &[TransactionResponse]) -> HashMap<String, PotActivity> {
    let mut activity: HashMap<String, PotActivity> = HashMap::new();
    for tx in transactions {
        let Some(pot_id) = tx.pot_id() else {
            continue;
        };
        let entry = activity.entry(pot_id.to_string()).or_default();
        if tx.amount < 0 {
            entry.credits += -tx.amount;
        } else {
            entry.debits += tx.amount;
        }
    }
    activity
}
