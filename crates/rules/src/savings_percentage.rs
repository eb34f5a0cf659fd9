use crate::distribution::{priority_distribution, Funding, PotTarget};
use crate::{funding_pots, Rule};
use core_types::{Pot, RuleId};
use executor::Ledger;

/// Sends a fixed share of each funding pot towards savings goals.
///
/// Each non-savings funding source contributes its configured saving value as a
/// fraction of its factored balance. Savings pots are filled tier by tier on their
/// saving priority. A funding pot with no saving value takes no part.
#[derive(Debug, Default)]
pub struct SavingsPercentageRule;

impl SavingsPercentageRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SavingsPercentageRule {
    fn id(&self) -> RuleId {
        RuleId::SavingsPercentage
    }

    fn apply(&mut self, ledger: &mut Ledger) {
        let pots = ledger.pots().to_vec();
        let destinations: Vec<&Pot> = pots
            .iter()
            .filter(|p| p.has_goal() && p.config.saving_priority > 0)
            .collect();
        if destinations.is_empty() {
            return;
        }
        let targets: Vec<PotTarget<'_>> = destinations
            .iter()
            .map(|p| PotTarget::new(p, p.goal, p.config.saving_priority))
            .collect();
        let sources = funding_pots(&pots, |p| {
            p.is_funding_source() && !p.locked && p.config.saving_priority == 0
        });

        for src in &sources {
            let fraction = src.config.saving_value;
            if fraction.is_zero() {
                continue;
            }
            let mut scoped = ledger.with_label(self.id().code());
            if let Err(e) = priority_distribution(src, &targets, &mut scoped, Funding::fraction(fraction)) {
                tracing::warn!(pot = %src.name, error = %e, "Skipping funding pot for savings percentage rule.");
            }
        }
    }
}
