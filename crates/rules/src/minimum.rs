use crate::distribution::{priority_distribution, Funding, PotTarget};
use crate::{funding_pots, Rule};
use chrono::{Datelike, NaiveDate};
use core_types::{Pot, PotId, RuleId};
use executor::Ledger;
use std::collections::HashMap;

/// Keeps pots topped up to their minimum amount.
///
/// Destinations are non-savings pots with a minimum; funding comes from unlocked
/// funding sources, tier by tier via `priority_distribution`. A pot with a minimum
/// transfer day only takes part after that day of the month, and at most once per
/// calendar month.
#[derive(Debug, Default)]
pub struct MinimumRule {
    last_transfer: HashMap<PotId, (i32, u32)>,
}

impl MinimumRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the monthly gating lets `pot` take part on `today`.
    pub fn is_due(&self, pot: &Pot, today: NaiveDate) -> bool {
        let day = pot.config.minimum_transfer_day;
        if day == 0 {
            return true;
        }
        if today.day() <= day {
            return false;
        }
        self.last_transfer.get(&pot.id) != Some(&(today.year(), today.month()))
    }
}

impl Rule for MinimumRule {
    fn id(&self) -> RuleId {
        RuleId::Minimum
    }

    fn apply(&mut self, ledger: &mut Ledger) {
        let today = ledger.cycle_date();
        let pots = ledger.pots().to_vec();

        let destinations: Vec<&Pot> = pots
            .iter()
            .filter(|p| p.config.minimum_amount > 0 && p.config.saving_priority == 0)
            .filter(|p| self.is_due(p, today))
            .collect();
        if destinations.is_empty() {
            return;
        }
        let targets: Vec<PotTarget<'_>> = destinations
            .iter()
            .map(|p| PotTarget::new(p, p.config.minimum_amount, p.config.minimum_priority))
            .collect();
        let sources = funding_pots(&pots, |p| {
            p.is_funding_source() && !p.locked && self.is_due(p, today)
        });

        let mut moved: Vec<PotId> = Vec::new();
        for src in &sources {
            let mut scoped = ledger.with_label(self.id().code());
            match priority_distribution(src, &targets, &mut scoped, Funding::default()) {
                Ok(funded) if !funded.is_empty() => {
                    moved.push(src.id.clone());
                    moved.extend(funded);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(pot = %src.name, error = %e, "Skipping funding pot for minimum rule.");
                }
            }
        }

        let stamp = (today.year(), today.month());
        for id in moved {
            self.last_transfer.insert(id, stamp);
        }
    }
}
