use crate::error::ExecutorError;
use crate::transfer::TransferExecutor;
use chrono::NaiveDate;
use core_types::{AccountSnapshot, Endpoint, Pot, PotId, Transfer};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// The label attached to proposals made outside any `with_label` scope.
pub const DEFAULT_LABEL: &str = "default";

/// The speculative ledger for one account and one cycle.
///
/// It holds the pot snapshot the cycle started from, an overlay of provisional
/// balances, and the append-only list of transfers proposed so far. Nothing here
/// touches the bank until `commit` is called, which consumes the ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    account_id: String,
    account_balance: i64,
    pots: Vec<Pot>,
    cycle_date: NaiveDate,
    balances: HashMap<PotId, i64>,
    factored_balances: HashMap<PotId, i64>,
    transfers: Vec<Transfer>,
    label: String,
}

/// What a commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub proposed: usize,
    /// Transfers actually sent to the executor. Always 0 for a dry run.
    pub executed: usize,
    pub total_amount: i64,
    pub dry_run: bool,
}

impl Ledger {
    pub fn new(
        account_id: impl Into<String>,
        account_balance: i64,
        pots: Vec<Pot>,
        cycle_date: NaiveDate,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_balance,
            pots,
            cycle_date,
            balances: HashMap::new(),
            factored_balances: HashMap::new(),
            transfers: Vec::new(),
            label: DEFAULT_LABEL.to_string(),
        }
    }

    /// Builds a ledger from an account snapshot.
    ///
    /// Fails with `NoBalance` when the bank did not report a spendable balance.
    pub fn from_snapshot(
        snapshot: AccountSnapshot,
        cycle_date: NaiveDate,
    ) -> Result<Self, ExecutorError> {
        let balance = snapshot
            .balance
            .ok_or_else(|| ExecutorError::NoBalance(snapshot.account.id.clone()))?;
        Ok(Self::new(snapshot.account.id, balance, snapshot.pots, cycle_date))
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The account's spendable balance after every proposed deposit and withdrawal.
    pub fn account_balance(&self) -> i64 {
        self.account_balance
    }

    /// The pot snapshot this cycle started from.
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn cycle_date(&self) -> NaiveDate {
        self.cycle_date
    }

    /// The label new proposals are currently tagged with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Every proposal so far, in creation order.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// The pot's real balance plus the net of every proposal touching it this cycle.
    pub fn get_balance(&self, pot: &Pot) -> i64 {
        self.balances.get(&pot.id).copied().unwrap_or(pot.balance)
    }

    /// Same as `get_balance`, applied to the pot's factored balance.
    pub fn get_factored_balance(&self, pot: &Pot) -> i64 {
        self.factored_balances
            .get(&pot.id)
            .copied()
            .unwrap_or_else(|| pot.factored_balance())
    }

    fn update_pot_balance(&mut self, pot: &Pot, amount: i64) {
        let balance = self.get_balance(pot) + amount;
        let factored = self.get_factored_balance(pot) + amount;
        self.balances.insert(pot.id.clone(), balance);
        self.factored_balances.insert(pot.id.clone(), factored);
    }

    fn record(&mut self, source: Endpoint, destination: Endpoint, amount: i64) {
        let transfer = Transfer {
            label: self.label.clone(),
            source,
            destination,
            amount,
        };
        tracing::debug!(account_id = %self.account_id, "Proposed: {}", transfer);
        self.transfers.push(transfer);
    }

    /// Proposes moving `amount` from one pot to another.
    ///
    /// Returns false, recording nothing, when the source cannot cover the amount, the
    /// amount is not positive, or both sides are the same pot.
    pub fn propose_transfer(&mut self, src: &Pot, dest: &Pot, amount: i64) -> bool {
        if amount <= 0 || src.id == dest.id {
            return false;
        }
        if self.get_balance(src) < amount {
            tracing::trace!(pot = %src.name, amount, "Insufficient pot balance; proposal dropped.");
            return false;
        }
        self.record(Endpoint::pot(src), Endpoint::pot(dest), amount);
        self.update_pot_balance(src, -amount);
        self.update_pot_balance(dest, amount);
        true
    }

    /// Proposes moving `amount` from a pot back to the account's spendable balance.
    pub fn propose_withdrawal(&mut self, pot: &Pot, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        if self.get_balance(pot) < amount {
            tracing::trace!(pot = %pot.name, amount, "Insufficient pot balance; withdrawal dropped.");
            return false;
        }
        self.record(Endpoint::pot(pot), Endpoint::Account, amount);
        self.update_pot_balance(pot, -amount);
        self.account_balance += amount;
        true
    }

    /// Proposes moving `amount` from the account's spendable balance into a pot.
    pub fn propose_deposit(&mut self, pot: &Pot, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        if self.account_balance < amount {
            tracing::trace!(pot = %pot.name, amount, "Insufficient account balance; deposit dropped.");
            return false;
        }
        self.record(Endpoint::Account, Endpoint::pot(pot), amount);
        self.account_balance -= amount;
        self.update_pot_balance(pot, amount);
        true
    }

    /// Tags every proposal made through the returned scope with `label`.
    ///
    /// The previous label is restored when the scope is dropped, including while
    /// unwinding from a panic.
    pub fn with_label(&mut self, label: impl Into<String>) -> LabelScope<'_> {
        let previous = std::mem::replace(&mut self.label, label.into());
        LabelScope {
            ledger: self,
            previous,
        }
    }

    /// Sends every proposal to the executor, in creation order.
    ///
    /// Each transfer is logged before it is attempted. With `dry_run` nothing is sent.
    /// Balances are not re-validated: the ledger's bookkeeping is trusted. The commit is
    /// not atomic; if a transfer fails, the ones before it stay executed and the rest
    /// are abandoned until the next cycle re-observes the balances.
    pub async fn commit(
        self,
        executor: &dyn TransferExecutor,
        dry_run: bool,
    ) -> Result<CommitReport, ExecutorError> {
        let total = self.transfers.len();
        let mut report = CommitReport {
            proposed: total,
            executed: 0,
            total_amount: 0,
            dry_run,
        };

        for transfer in &self.transfers {
            tracing::info!(
                account_id = %self.account_id,
                label = %transfer.label,
                dry_run,
                "{}",
                transfer
            );
            report.total_amount += transfer.amount;
            if dry_run {
                continue;
            }
            if let Err(e) = executor.execute(&self.account_id, transfer).await {
                tracing::error!(
                    account_id = %self.account_id,
                    executed = report.executed,
                    total,
                    error = %e,
                    "Transfer failed; earlier transfers stay executed, the rest are abandoned."
                );
                return Err(ExecutorError::PartialCommit {
                    executed: report.executed,
                    total,
                    source: Box::new(e),
                });
            }
            report.executed += 1;
        }

        Ok(report)
    }
}

/// A guard that keeps a label active on its ledger until dropped.
pub struct LabelScope<'a> {
    ledger: &'a mut Ledger,
    previous: String,
}

impl Deref for LabelScope<'_> {
    type Target = Ledger;

    fn deref(&self) -> &Ledger {
        self.ledger
    }
}

impl DerefMut for LabelScope<'_> {
    fn deref_mut(&mut self) -> &mut Ledger {
        self.ledger
    }
}

impl Drop for LabelScope<'_> {
    fn drop(&mut self) {
        self.ledger.label = std::mem::take(&mut self.previous);
    }
}
