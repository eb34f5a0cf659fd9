//! # Allocation Rules
//!
//! This crate contains the allocation logic of the pot rebalancer. It defines a
//! universal `Rule` trait, the two distribution algorithms every rule is built on,
//! and the five concrete rules.
//!
//! ## Architectural Principles
//!
//! - **Pure ledger logic:** Rules have no knowledge of the bank API. They read the
//!   pot snapshot and provisional balances from the `Ledger` and propose transfers on it.
//! - **Rule agnostic engine:** The engine runs any list of `Box<dyn Rule>` in order
//!   without knowing their internals.
//! - **Rule-owned state:** State that must survive between cycles (the month a pot was
//!   last topped up, the last observed round-up balance) lives inside the rule, keyed
//!   by pot id. Pots stay plain value snapshots.
//!
//! ## Public API
//!
//! - `Rule`: the core trait all rules implement.
//! - `create_rule` / `create_rules`: the factory.
//! - `priority_distribution` / `weighted_distribution`: the distribution algorithms.
//! - The concrete rule structs themselves (e.g. `MinimumRule`).

// Declare all the modules that constitute this crate.
pub mod distribution;
pub mod error;
pub mod factory;
pub mod goal;
pub mod minimum;
pub mod roundup;
pub mod savings_overflow;
pub mod savings_percentage;

// Re-export the key components to create a clean, public-facing API.
pub use distribution::{priority_distribution, weighted_distribution, Funding, PotTarget};
pub use error::RuleError;
pub use factory::{create_rule, create_rules};
pub use goal::GoalRule;
pub use minimum::MinimumRule;
pub use roundup::{roundup_cap, RoundupRule};
pub use savings_overflow::SavingsOverflowRule;
pub use savings_percentage::SavingsPercentageRule;

// Re-export RuleId from core_types
pub use core_types::RuleId;

use core_types::Pot;
use executor::Ledger;

/// The core trait that all allocation rules must implement.
///
/// `apply` takes `&mut self` because some rules keep state across cycles. The
/// `Send + Sync` bounds let an account's rule list move between runtime threads.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Proposes this rule's transfers on the ledger.
    ///
    /// Every proposal is tagged with the rule's code. A funding pot whose parameters
    /// cannot be used is skipped with a warning; it never aborts the rest of the rule.
    fn apply(&mut self, ledger: &mut Ledger);
}

/// Selects funding pots with `filter`, highest funding priority first.
///
/// The sort is stable so pots with equal priority keep their snapshot order.
pub(crate) fn funding_pots(pots: &[Pot], filter: impl Fn(&Pot) -> bool) -> Vec<Pot> {
    let mut selected: Vec<Pot> = pots.iter().filter(|p| filter(p)).cloned().collect();
    selected.sort_by(|a, b| b.config.funding_priority.cmp(&a.config.funding_priority));
    selected
}
