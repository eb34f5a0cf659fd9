//! Tests for mapping transfer records onto bank API calls.

use api_client::{ApiError, BankClient, PotResponse, TransactionResponse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Account, Endpoint, PotId, Transfer};
use executor::{ExecutorError, LiveExecutor, TransferExecutor};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Deposit { pot: String, amount: i64 },
    Withdraw { pot: String, amount: i64 },
}

#[derive(Default)]
struct FakeBank {
    calls: Mutex<Vec<Call>>,
    dedupe_ids: Mutex<Vec<String>>,
    fail_deposits: bool,
}

#[async_trait]
impl BankClient for FakeBank {
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        Ok(vec![])
    }

    async fn get_balance(&self, _account_id: &str) -> Result<Option<i64>, ApiError> {
        Ok(Some(0))
    }

    async fn list_pots(&self, _account_id: &str) -> Result<Vec<PotResponse>, ApiError> {
        Ok(vec![])
    }

    async fn list_transactions(
        &self,
        _account_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<Vec<TransactionResponse>, ApiError> {
        Ok(vec![])
    }

    async fn deposit(&self, pot_id: &str, _account_id: &str, amount: i64, dedupe_id: &str) -> Result<(), ApiError> {
        if self.fail_deposits {
            return Err(ApiError::Deserialization("boom".to_string()));
        }
        self.dedupe_ids.lock().unwrap().push(dedupe_id.to_string());
        self.calls.lock().unwrap().push(Call::Deposit { pot: pot_id.to_string(), amount });
        Ok(())
    }

    async fn withdraw(&self, pot_id: &str, _account_id: &str, amount: i64, dedupe_id: &str) -> Result<(), ApiError> {
        self.dedupe_ids.lock().unwrap().push(dedupe_id.to_string());
        self.calls.lock().unwrap().push(Call::Withdraw { pot: pot_id.to_string(), amount });
        Ok(())
    }
}

fn pot(id: &str) -> Endpoint {
    Endpoint::Pot {
        id: PotId::new(id),
        name: id.to_uppercase(),
    }
}

fn transfer(source: Endpoint, destination: Endpoint, amount: i64) -> Transfer {
    Transfer {
        label: "PGP".to_string(),
        source,
        destination,
        amount,
    }
}

#[tokio::test]
async fn test_pot_to_pot_is_withdraw_then_deposit() {
    let bank = Arc::new(FakeBank::default());
    let executor = LiveExecutor::new(bank.clone(), Duration::ZERO);

    executor
        .execute("acc_1", &transfer(pot("a"), pot("b"), 750))
        .await
        .unwrap();

    assert_eq!(
        *bank.calls.lock().unwrap(),
        vec![
            Call::Withdraw { pot: "a".to_string(), amount: 750 },
            Call::Deposit { pot: "b".to_string(), amount: 750 },
        ]
    );
    let ids = bank.dedupe_ids.lock().unwrap();
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_account_endpoints_map_to_single_calls() {
    let bank = Arc::new(FakeBank::default());
    let executor = LiveExecutor::new(bank.clone(), Duration::ZERO);

    executor
        .execute("acc_1", &transfer(pot("a"), Endpoint::Account, 100))
        .await
        .unwrap();
    executor
        .execute("acc_1", &transfer(Endpoint::Account, pot("b"), 200))
        .await
        .unwrap();

    assert_eq!(
        *bank.calls.lock().unwrap(),
        vec![
            Call::Withdraw { pot: "a".to_string(), amount: 100 },
            Call::Deposit { pot: "b".to_string(), amount: 200 },
        ]
    );
}

#[tokio::test]
async fn test_api_failures_surface_as_executor_errors() {
    let bank = Arc::new(FakeBank {
        fail_deposits: true,
        ..FakeBank::default()
    });
    let executor = LiveExecutor::new(bank.clone(), Duration::ZERO);

    let err = executor
        .execute("acc_1", &transfer(Endpoint::Account, pot("b"), 200))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutorError::Api(_)));

    let err = executor
        .execute("acc_1", &transfer(Endpoint::Account, Endpoint::Account, 200))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutorError::InvalidTransfer(_)));
}

#[tokio::test(start_paused = true)]
async fn test_every_call_is_followed_by_the_pause() {
    let bank = Arc::new(FakeBank::default());
    let executor = LiveExecutor::new(bank.clone(), Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    executor
        .execute("acc_1", &transfer(pot("a"), pot("b"), 10))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_secs(4));
}
