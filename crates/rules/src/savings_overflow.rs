use crate::distribution::{priority_distribution, Funding, PotTarget};
use crate::{funding_pots, Rule};
use core_types::{Pot, RuleId};
use executor::Ledger;

/// Sweeps whatever funding pots still hold after the other rules into savings goals.
#[derive(Debug, Default)]
pub struct SavingsOverflowRule;

impl SavingsOverflowRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SavingsOverflowRule {
    fn id(&self) -> RuleId {
        RuleId::SavingsOverflow
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
            let mut scoped = ledger.with_label(self.id().code());
            if let Err(e) = priority_distribution(src, &targets, &mut scoped, Funding::default()) {
                tracing::warn!(pot = %src.name, error = %e, "Skipping funding pot for savings overflow rule.");
            }
        }
    }
}
