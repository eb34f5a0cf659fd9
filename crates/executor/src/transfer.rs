use crate::error::ExecutorError;
use api_client::BankClient;
use async_trait::async_trait;
use core_types::{Endpoint, Transfer};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A generic trait for executing one committed transfer record.
///
/// This trait allows the ledger's commit to be agnostic about whether it is talking
/// to the real bank or to a test double.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Performs the real movement described by `transfer` on `account_id`.
    async fn execute(&self, account_id: &str, transfer: &Transfer) -> Result<(), ExecutorError>;
}

/// The "live" executor that moves real money through the `BankClient`.
///
/// The bank only exposes deposits into and withdrawals out of a pot, so a pot-to-pot
/// transfer is a withdrawal to the account followed by a deposit. Every call is
/// followed by `pause` to stay within the API's rate limits.
pub struct LiveExecutor {
    api_client: Arc<dyn BankClient>,
    pause: Duration,
}

impl LiveExecutor {
    pub fn new(api_client: Arc<dyn BankClient>, pause: Duration) -> Self {
        Self { api_client, pause }
    }

    async fn withdraw(&self, pot_id: &str, account_id: &str, amount: i64) -> Result<(), ExecutorError> {
        let dedupe_id = Uuid::new_v4().simple().to_string();
        let result = self
            .api_client
            .withdraw(pot_id, account_id, amount, &dedupe_id)
            .await
            .map_err(|e| ExecutorError::Api(e.to_string()));
        tokio::time::sleep(self.pause).await;
        result
    }

    async fn deposit(&self, pot_id: &str, account_id: &str, amount: i64) -> Result<(), ExecutorError> {
        let dedupe_id = Uuid::new_v4().simple().to_string();
        let result = self
            .api_client
            .deposit(pot_id, account_id, amount, &dedupe_id)
            .await
            .map_err(|e| ExecutorError::Api(e.to_string()));
        tokio::time::sleep(self.pause).await;
        result
    }
}

#[async_trait]
impl TransferExecutor for LiveExecutor {
    async fn execute(&self, account_id: &str, transfer: &Transfer) -> Result<(), ExecutorError> {
        if transfer.amount <= 0 {
            return Err(ExecutorError::InvalidTransfer(format!(
                "non-positive amount {}",
                transfer.amount
            )));
        }

        match (&transfer.source, &transfer.destination) {
            (Endpoint::Pot { id: src, .. }, Endpoint::Pot { id: dest, .. }) => {
                self.withdraw(src.as_str(), account_id, transfer.amount).await?;
                self.deposit(dest.as_str(), account_id, transfer.amount).await
            }
            (Endpoint::Pot { id, .. }, Endpoint::Account) => {
                self.withdraw(id.as_str(), account_id, transfer.amount).await
            }
            (Endpoint::Account, Endpoint::Pot { id, .. }) => {
                self.deposit(id.as_str(), account_id, transfer.amount).await
            }
            (Endpoint::Account, Endpoint::Account) => Err(ExecutorError::InvalidTransfer(
                "account-to-account transfers are not supported".to_string(),
            )),
        }
    }
}
