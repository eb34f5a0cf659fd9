use api_client::BankClient;
use chrono::{Local, NaiveDate};
use configuration::EngineConfig;
use core_types::{Account, AccountSnapshot};
use executor::{Ledger, TransferExecutor};
use std::sync::Arc;

pub mod account_manager;
pub mod error;
pub mod pot_manager;

pub use account_manager::AccountManager;
pub use error::EngineError;
pub use pot_manager::{build_pot, collect_activity, PotManager};

/// The central orchestrator for the polling loop.
///
/// Accounts are discovered once at start-up. Each cycle processes them one after
/// another, each against its own ledger; a failing account is logged and retried on
/// the next cycle without affecting the others.
pub struct LiveEngine {
    // --- Configuration ---
    config: EngineConfig,

    // --- Shared Components ---
    api_client: Arc<dyn BankClient>,
    executor: Arc<dyn TransferExecutor>,
    pot_manager: Arc<PotManager>,

    // --- Account Management ---
    managers: Vec<AccountManager>,
}

impl LiveEngine {
    pub fn new(
        config: EngineConfig,
        api_client: Arc<dyn BankClient>,
        executor: Arc<dyn TransferExecutor>,
    ) -> Self {
        let pot_manager = Arc::new(PotManager::new(Arc::clone(&api_client), &config));
        Self {
            config,
            api_client,
            executor,
            pot_manager,
            managers: Vec::new(),
        }
    }

    pub fn managers(&self) -> &[AccountManager] {
        &self.managers
    }

    /// Discovers the open accounts and builds one manager per account.
    pub async fn init(&mut self) -> Result<(), EngineError> {
        let accounts = self.api_client.list_accounts().await?;
        self.managers = accounts
            .into_iter()
            .filter(|a| !a.closed)
            .map(|account| {
                tracing::info!(account_id = %account.id, description = %account.description, "Managing account.");
                AccountManager::new(
                    account,
                    Arc::clone(&self.pot_manager),
                    Arc::clone(&self.executor),
                    rules::create_rules(&self.config.rules),
                    self.config.dry_run,
                )
            })
            .collect();
        Ok(())
    }

    /// Runs one cycle over every account. Errors are logged, never returned.
    pub async fn run_cycle(&mut self, today: NaiveDate) {
        for manager in self.managers.iter_mut() {
            if let Err(e) = manager.optimize_account(today).await {
                tracing::error!(
                    account_id = %manager.account().id,
                    error = %e,
                    "Account cycle aborted; retrying next cycle."
                );
            }
        }
    }

    /// Proposes one cycle for every account without committing anything.
    ///
    /// A failing account is logged and left out; the others are still planned.
    pub async fn plan(&mut self, today: NaiveDate) -> Vec<(Account, Ledger)> {
        let mut plans = Vec::new();
        for manager in self.managers.iter_mut() {
            match manager.plan(today).await {
                Ok(ledger) => plans.push((manager.account().clone(), ledger)),
                Err(e) => {
                    tracing::error!(account_id = %manager.account().id, error = %e, "Could not plan account.");
                }
            }
        }
        plans
    }

    /// Fetches a fresh snapshot of every account. Failing accounts are logged and left out.
    pub async fn snapshots(&self) -> Vec<AccountSnapshot> {
        let mut snapshots = Vec::new();
        for manager in &self.managers {
            match self.pot_manager.snapshot(manager.account()).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::error!(account_id = %manager.account().id, error = %e, "Could not fetch account.");
                }
            }
        }
        snapshots
    }

    /// The main polling loop. Stops after one cycle with `once`, or on Ctrl-C.
    pub async fn run(&mut self, once: bool) -> Result<(), EngineError> {
        self.init().await?;
        if self.managers.is_empty() {
            tracing::warn!("No open accounts found. Exiting.");
            return Ok(());
        }

        tracing::info!(
            accounts = self.managers.len(),
            dry_run = self.config.dry_run,
            rules = ?self.config.rules,
            "Engine is running."
        );

        let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());
        loop {
            self.run_cycle(Local::now().date_naive()).await;
            if once {
                break;
            }
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Ctrl-C received. Shutting down.");
                    break;
                }
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }
        }
        Ok(())
    }
}
