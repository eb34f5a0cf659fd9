use crate::distribution::{weighted_distribution, Funding, PotTarget};
use crate::{funding_pots, Rule};
use core_types::{Pot, RuleId};
use executor::Ledger;

/// Spreads funding across spending goals in proportion to their weights.
#[derive(Debug, Default)]
pub struct GoalRule;

impl GoalRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for GoalRule {
    fn id(&self) -> RuleId {
        RuleId::Goal
    }

    fn apply(&mut self, ledger: &mut Ledger) {
        let pots = ledger.pots().to_vec();
        let destinations: Vec<&Pot> = pots
            .iter()
            .filter(|p| p.has_goal() && !p.is_savings && !p.is_funding_source())
            .collect();
        if destinations.is_empty() {
            return;
        }
        let targets: Vec<PotTarget<'_>> = destinations
            .iter()
            .map(|p| PotTarget::new(p, p.goal, p.config.weighted_priority))
            .collect();
        let sources = funding_pots(&pots, |p| p.is_funding_source() && !p.locked && !p.is_savings);

        for src in &sources {
            let mut scoped = ledger.with_label(self.id().code());
            if let Err(e) = weighted_distribution(src, &targets, &mut scoped, Funding::default()) {
                tracing::warn!(pot = %src.name, error = %e, "Skipping funding pot for goal rule.");
            }
        }
    }
}
