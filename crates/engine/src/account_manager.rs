use crate::error::EngineError;
use crate::pot_manager::PotManager;
use chrono::NaiveDate;
use core_types::{Account, AccountSnapshot};
use executor::{CommitReport, Ledger, TransferExecutor};
use rules::Rule;
use std::sync::Arc;

/// Runs the allocation cycle for a single account.
///
/// Each cycle builds a fresh ledger from the latest snapshot, applies every rule in
/// registration order, commits, then refreshes the snapshot for the next cycle. The
/// rules themselves live as long as the manager, so their cross-cycle state survives.
pub struct AccountManager {
    account: Account,
    pot_manager: Arc<PotManager>,
    executor: Arc<dyn TransferExecutor>,
    rules: Vec<Box<dyn Rule>>,
    dry_run: bool,
    snapshot: Option<AccountSnapshot>,
}

impl AccountManager {
    pub fn new(
        account: Account,
        pot_manager: Arc<PotManager>,
        executor: Arc<dyn TransferExecutor>,
        rules: Vec<Box<dyn Rule>>,
        dry_run: bool,
    ) -> Self {
        Self {
            account,
            pot_manager,
            executor,
            rules,
            dry_run,
            snapshot: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The snapshot the next cycle will start from, if one is held.
    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref()
    }

    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        self.snapshot = Some(self.pot_manager.snapshot(&self.account).await?);
        Ok(())
    }

    /// Proposes this cycle's transfers without committing them.
    pub async fn plan(&mut self, today: NaiveDate) -> Result<Ledger, EngineError> {
        let snapshot = self.take_snapshot().await?;
        self.apply_rules(snapshot, today)
    }

    /// Runs one full cycle: propose, commit, refresh.
    ///
    /// On any failure the held snapshot is discarded so the next cycle starts from a
    /// fresh fetch.
    pub async fn optimize_account(&mut self, today: NaiveDate) -> Result<CommitReport, EngineError> {
        let snapshot = self.take_snapshot().await?;
        let ledger = self.apply_rules(snapshot, today)?;
        let report = ledger.commit(self.executor.as_ref(), self.dry_run).await?;

        tracing::info!(
            account_id = %self.account.id,
            proposed = report.proposed,
            executed = report.executed,
            total_amount = report.total_amount,
            dry_run = report.dry_run,
            "Cycle complete."
        );

        self.refresh().await?;
        Ok(report)
    }

    async fn take_snapshot(&mut self) -> Result<AccountSnapshot, EngineError> {
        match self.snapshot.take() {
            Some(snapshot) => Ok(snapshot),
            None => self.pot_manager.snapshot(&self.account).await,
        }
    }

    fn apply_rules(&mut self, snapshot: AccountSnapshot, today: NaiveDate) -> Result<Ledger, EngineError> {
        let mut ledger = Ledger::from_snapshot(snapshot, today)?;
        for rule in self.rules.iter_mut() {
            tracing::debug!(account_id = %self.account.id, rule = %rule.id(), "Applying rule.");
            rule.apply(&mut ledger);
        }
        Ok(ledger)
    }
}
