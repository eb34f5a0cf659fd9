use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use configuration::ApiConfig;
use core_types::Account;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

pub mod error;
pub mod responses;
// --- Public API ---
pub use error::ApiError;
pub use responses::{
    AccountResponse, ApiErrorResponse, BalanceResponse, PotResponse, TransactionResponse,
};
use responses::{AccountsResponse, PotsResponse, TransactionsResponse};

/// The generic, abstract interface for the bank API.
/// This trait is the contract the snapshot provider and the live executor use,
/// allowing the underlying implementation (live or fake) to be swapped out.
#[async_trait]
pub trait BankClient: Send + Sync {
    /// Lists every account the token can see, including closed ones.
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError>;

    /// Fetches the spendable balance. `None` when the bank reports no balance.
    async fn get_balance(&self, account_id: &str) -> Result<Option<i64>, ApiError>;

    /// Lists the account's pots, including deleted ones.
    async fn list_pots(&self, account_id: &str) -> Result<Vec<PotResponse>, ApiError>;

    /// Lists transactions created since the given instant.
    async fn list_transactions(
        &self,
        account_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransactionResponse>, ApiError>;

    /// Moves `amount` from the account's spendable balance into a pot.
    async fn deposit(
        &self,
        pot_id: &str,
        account_id: &str,
        amount: i64,
        dedupe_id: &str,
    ) -> Result<(), ApiError>;

    /// Moves `amount` from a pot back to the account's spendable balance.
    async fn withdraw(
        &self,
        pot_id: &str,
        account_id: &str,
        amount: i64,
        dedupe_id: &str,
    ) -> Result<(), ApiError>;
}

/// A concrete implementation of the `BankClient` for the Monzo API.
#[derive(Clone)]
pub struct MonzoClient {
    client: reqwest::Client,
    base_url: String,
}

impl MonzoClient {
    pub fn new(api_config: &ApiConfig) -> Result<Self, ApiError> {
        let token = api_config
            .access_token()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidConfig("access token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            client: reqwest::Client::builder().default_headers(headers).build()?,
            base_url: api_config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_response(status, &text)
    }
}

/// Turns a raw HTTP status and body into either the expected payload or an `ApiError`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, ApiError> {
    if status.is_success() {
        serde_json::from_str::<T>(text).map_err(|e| ApiError::Deserialization(e.to_string()))
    } else {
        let api_error: ApiErrorResponse = serde_json::from_str(text).map_err(|e| {
            ApiError::Deserialization(format!(
                "Failed to deserialize error response: {}. Original text: {}",
                e, text
            ))
        })?;
        Err(ApiError::Status {
            status: status.as_u16(),
            code: api_error.code,
            message: api_error.message,
        })
    }
}

#[async_trait]
impl BankClient for MonzoClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let response: AccountsResponse = self.send(self.client.get(self.url("/accounts"))).await?;
        Ok(response
            .accounts
            .into_iter()
            .map(|a| Account {
                id: a.id,
                description: a.description,
                closed: a.closed,
            })
            .collect())
    }

    async fn get_balance(&self, account_id: &str) -> Result<Option<i64>, ApiError> {
        let request = self
            .client
            .get(self.url("/balance"))
            .query(&[("account_id", account_id)]);
        let response: BalanceResponse = self.send(request).await?;
        Ok(response.balance)
    }

    async fn list_pots(&self, account_id: &str) -> Result<Vec<PotResponse>, ApiError> {
        let request = self
            .client
            .get(self.url("/pots"))
            .query(&[("current_account_id", account_id)]);
        let response: PotsResponse = self.send(request).await?;
        Ok(response.pots)
    }

    async fn list_transactions(
        &self,
        account_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransactionResponse>, ApiError> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let request = self
            .client
            .get(self.url("/transactions"))
            .query(&[("account_id", account_id), ("since", since.as_str())]);
        let response: TransactionsResponse = self.send(request).await?;
        Ok(response.transactions)
    }

    async fn deposit(
        &self,
        pot_id: &str,
        account_id: &str,
        amount: i64,
        dedupe_id: &str,
    ) -> Result<(), ApiError> {
        tracing::debug!(pot_id, amount, "Depositing into pot.");
        let amount = amount.to_string();
        let request = self
            .client
            .put(self.url(&format!("/pots/{}/deposit", pot_id)))
            .form(&[
                ("source_account_id", account_id),
                ("amount", amount.as_str()),
                ("dedupe_id", dedupe_id),
            ]);
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    async fn withdraw(
        &self,
        pot_id: &str,
        account_id: &str,
        amount: i64,
        dedupe_id: &str,
    ) -> Result<(), ApiError> {
        tracing::debug!(pot_id, amount, "Withdrawing from pot.");
        let amount = amount.to_string();
        let request = self
            .client
            .put(self.url(&format!("/pots/{}/withdraw", pot_id)))
            .form(&[
                ("destination_account_id", account_id),
                ("amount", amount.as_str()),
                ("dedupe_id", dedupe_id),
            ]);
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }
}
