//! The two distribution algorithms every rule is built on.
//!
//! Both move funds from one source pot towards a set of destination targets by
//! proposing transfers on the ledger. Neither ever pushes a destination above its
//! target or spends more than the source's budget.

use crate::error::RuleError;
use core_types::{Pot, PotId};
use executor::Ledger;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A destination pot paired with the balance it should reach.
///
/// `priority` is the tier for `priority_distribution` and the weight for
/// `weighted_distribution`.
#[derive(Debug, Clone, Copy)]
pub struct PotTarget<'a> {
    pub pot: &'a Pot,
    pub target: i64,
    pub priority: u32,
}

impl<'a> PotTarget<'a> {
    pub fn new(pot: &'a Pot, target: i64, priority: u32) -> Self {
        Self { pot, target, priority }
    }
}

/// How much of the source's factored balance a distribution may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funding {
    /// Share of the factored balance, in `[0, 1]`.
    pub fraction: Decimal,
    /// Upper bound on the budget, in minor units. `None` and `Some(0)` are uncapped.
    pub cap: Option<i64>,
}

impl Default for Funding {
    fn default() -> Self {
        Self {
            fraction: Decimal::ONE,
            cap: None,
        }
    }
}

impl Funding {
    pub fn fraction(fraction: Decimal) -> Self {
        Self {
            fraction,
            ..Self::default()
        }
    }

    /// A full-balance budget limited to `cap`; a cap of 0 leaves it uncapped.
    pub fn capped(cap: i64) -> Self {
        Self {
            cap: (cap != 0).then_some(cap),
            ..Self::default()
        }
    }

    /// The spendable budget for a source whose provisional factored balance is `factored`.
    pub fn budget(&self, factored: i64) -> Result<i64, RuleError> {
        if self.fraction < Decimal::ZERO || self.fraction > Decimal::ONE {
            return Err(RuleError::InvalidFraction(self.fraction));
        }
        if factored <= 0 {
            return Ok(0);
        }
        let scaled = (Decimal::from(factored) * self.fraction)
            .trunc()
            .to_i64()
            .ok_or_else(|| RuleError::Calculation(format!("budget overflow for {factored}")))?;
        Ok(match self.cap {
            Some(cap) if cap != 0 && cap < scaled => cap.max(0),
            _ => scaled,
        })
    }
}

/// Fills targets tier by tier, highest priority first.
///
/// Inside a tier the pots furthest above target come first and the remaining budget is
/// split evenly across the pots not yet served, so budget a full pot does not need
/// flows on to the rest of the tier. Lower tiers only receive what higher tiers leave.
/// Returns the ids of the pots that received funds.
pub fn priority_distribution(
    src: &Pot,
    targets: &[PotTarget<'_>],
    ledger: &mut Ledger,
    funding: Funding,
) -> Result<Vec<PotId>, RuleError> {
    let mut budget = funding.budget(ledger.get_factored_balance(src))?;
    let mut funded = Vec::new();

    let mut tiers: BTreeMap<u32, Vec<PotTarget<'_>>> = BTreeMap::new();
    for target in targets.iter().filter(|t| t.pot.id != src.id) {
        tiers.entry(target.priority).or_default().push(*target);
    }

    for (_, mut tier) in tiers.into_iter().rev() {
        tier.sort_by_key(|t| std::cmp::Reverse(ledger.get_balance(t.pot) - t.target));

        let mut remaining = tier.len() as i64;
        for target in tier {
            if budget <= 0 {
                return Ok(funded);
            }
            let share = budget / remaining;
            let need = (target.target - ledger.get_balance(target.pot)).max(0);
            let amount = need.min(share);
            if amount > 0 && ledger.propose_transfer(src, target.pot, amount) {
                budget -= amount;
                funded.push(target.pot.id.clone());
            }
            remaining -= 1;
        }
    }

    Ok(funded)
}

/// Splits the budget across targets in proportion to their weights.
///
/// Pots furthest above target relative to their weight are visited first; each gets
/// its weight's slice of what is left and unused slices roll forward. Weight-zero
/// targets never receive anything. Returns the ids of the pots that received funds.
pub fn weighted_distribution(
    src: &Pot,
    targets: &[PotTarget<'_>],
    ledger: &mut Ledger,
    funding: Funding,
) -> Result<Vec<PotId>, RuleError> {
    let mut budget = funding.budget(ledger.get_factored_balance(src))?;
    let mut funded = Vec::new();

    let mut ordered: Vec<PotTarget<'_>> = targets
        .iter()
        .filter(|t| t.pot.id != src.id)
        .copied()
        .collect();
    let mut slices: i64 = ordered.iter().map(|t| i64::from(t.priority)).sum();

    // Exact comparison of (balance - target) / max(weight, 1), descending.
    ordered.sort_by(|a, b| {
        let (na, da) = weighted_key(ledger, a);
        let (nb, db) = weighted_key(ledger, b);
        (nb * da).cmp(&(na * db))
    });

    for target in ordered {
        if target.priority == 0 {
            continue;
        }
        if budget <= 0 {
            break;
        }
        let weight = i64::from(target.priority);
        let allocation = budget / slices * weight;
        let need = (target.target - ledger.get_balance(target.pot)).max(0);
        let amount = need.min(allocation);
        if amount > 0 && ledger.propose_transfer(src, target.pot, amount) {
            budget -= amount;
            funded.push(target.pot.id.clone());
        }
        slices -= weight;
    }

    Ok(funded)
}

fn weighted_key(ledger: &Ledger, target: &PotTarget<'_>) -> (i128, i128) {
    let surplus = i128::from(ledger.get_balance(target.pot) - target.target);
    (surplus, i128::from(target.priority.max(1)))
}
