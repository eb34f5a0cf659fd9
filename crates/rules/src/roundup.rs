use crate::distribution::{priority_distribution, Funding, PotTarget};
use crate::{funding_pots, Rule};
use core_types::{Pot, PotId, RuleId};
use executor::Ledger;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// How much a round-up collector may release after its balance dropped by `drop`.
///
/// `rate` of the drop, truncated, unless that does not exceed `minimum`. A result of 0
/// leaves the release uncapped.
pub fn roundup_cap(drop: i64, rate: Decimal, minimum: i64) -> i64 {
    let computed = (Decimal::from(drop) * rate)
        .trunc()
        .to_i64()
        .unwrap_or(0);
    if computed > minimum { computed } else { minimum }
}

/// Turns spending out of a round-up collector into matching savings deposits.
///
/// The rule remembers each collector's factored balance at the end of the previous
/// cycle. When the collector has dropped since then, a capped amount is released into
/// savings goals. The first cycle for a collector only records its baseline.
#[derive(Debug, Default)]
pub struct RoundupRule {
    previous: HashMap<PotId, i64>,
}

impl RoundupRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// The factored balance recorded for `pot` at the end of its last cycle.
    pub fn baseline(&self, pot: &PotId) -> Option<i64> {
        self.previous.get(pot).copied()
    }
}

impl Rule for RoundupRule {
    fn id(&self) -> RuleId {
        RuleId::Roundup
    }

    fn apply(&mut self, ledger: &mut Ledger) {
        let pots = ledger.pots().to_vec();
        let destinations: Vec<&Pot> = pots
            .iter()
            .filter(|p| p.has_goal() && p.config.saving_priority > 0 && !p.is_roundup_collector())
            .collect();
        let targets: Vec<PotTarget<'_>> = destinations
            .iter()
            .map(|p| PotTarget::new(p, p.goal, p.config.saving_priority))
            .collect();
        let collectors = funding_pots(&pots, |p| p.is_roundup_collector() && !p.locked);

        for src in &collectors {
            if let Some(previous) = self.baseline(&src.id) {
                let drop = previous - src.factored_balance();
                let cap = roundup_cap(drop, src.config.roundup_value, src.config.roundup_minimum);
                if drop > 0 && !targets.is_empty() {
                    tracing::debug!(pot = %src.name, drop, cap, "Round-up collector balance dropped.");
                    let mut scoped = ledger.with_label(self.id().code());
                    if let Err(e) = priority_distribution(src, &targets, &mut scoped, Funding::capped(cap)) {
                        tracing::warn!(pot = %src.name, error = %e, "Skipping round-up collector.");
                    }
                }
            }
            self.previous.insert(src.id.clone(), ledger.get_factored_balance(src));
        }
    }
}
