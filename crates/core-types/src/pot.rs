use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable identifier the bank assigns to a pot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PotId(String);

impl PotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rule parameters resolved from a pot's configuration.
///
/// All amounts are in minor currency units. Rates are fractions, so a savings
/// percentage of 25% is stored as `0.25`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotConfig {
    /// Reserve the minimum-funding rule tops the pot up to. Also excluded from the
    /// pot's factored balance.
    pub minimum_amount: i64,
    pub minimum_priority: u32,
    /// Day of the month after which the minimum top-up may run. `0` means ungated.
    pub minimum_transfer_day: u32,
    /// Non-zero marks the pot as a funding source; higher values are drained first.
    pub funding_priority: u32,
    /// Weight used by the goal rule's proportional distribution.
    pub weighted_priority: u32,
    /// Fraction of the factored balance released to savings pots.
    pub saving_value: Decimal,
    /// Non-zero marks the pot as a savings destination, grouped by this tier.
    pub saving_priority: u32,
    /// Fraction of the round-up balance drop that is captured.
    pub roundup_value: Decimal,
    pub roundup_minimum: i64,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            minimum_amount: 0,
            minimum_priority: 1,
            minimum_transfer_day: 0,
            funding_priority: 0,
            weighted_priority: 1,
            saving_value: Decimal::ZERO,
            saving_priority: 0,
            roundup_value: Decimal::ZERO,
            roundup_minimum: 0,
        }
    }
}

/// Money that moved in or out of a pot during the snapshot's transaction window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotActivity {
    pub credits: i64,
    pub debits: i64,
}

/// A read-only snapshot of a single pot, rebuilt from the bank every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    pub id: PotId,
    /// Display name with the configuration suffix stripped.
    pub name: String,
    pub balance: i64,
    /// Goal amount; `0` when the pot has none.
    pub goal: i64,
    pub locked: bool,
    pub is_savings: bool,
    pub config: PotConfig,
    pub activity: PotActivity,
}

impl Pot {
    /// Creates an unlocked, non-savings pot with default configuration.
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: i64) -> Self {
        Self {
            id: PotId::new(id),
            name: name.into(),
            balance,
            goal: 0,
            locked: false,
            is_savings: false,
            config: PotConfig::default(),
            activity: PotActivity::default(),
        }
    }

    pub fn with_goal(mut self, goal: i64) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_config(mut self, config: PotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_savings(mut self, is_savings: bool) -> Self {
        self.is_savings = is_savings;
        self
    }

    /// The part of the balance above the pot's own minimum reserve.
    pub fn factored_balance(&self) -> i64 {
        self.balance - self.config.minimum_amount
    }

    pub fn is_funding_source(&self) -> bool {
        self.config.funding_priority != 0
    }

    pub fn is_roundup_collector(&self) -> bool {
        self.config.roundup_minimum > 0 || !self.config.roundup_value.is_zero()
    }

    pub fn has_goal(&self) -> bool {
        self.goal > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn factored_balance_excludes_minimum() {
        let pot = Pot::new("p1", "Bills", 12_000).with_config(PotConfig {
            minimum_amount: 10_000,
            ..PotConfig::default()
        });
        assert_eq!(pot.factored_balance(), 2_000);

        let short = Pot::new("p2", "Bills", 4_000).with_config(PotConfig {
            minimum_amount: 10_000,
            ..PotConfig::default()
        });
        assert_eq!(short.factored_balance(), -6_000);
    }

    #[test]
    fn roundup_collector_from_either_parameter() {
        let by_rate = Pot::new("p1", "Coins", 0).with_config(PotConfig {
            roundup_value: dec!(0.1),
            ..PotConfig::default()
        });
        let by_minimum = Pot::new("p2", "Coins", 0).with_config(PotConfig {
            roundup_minimum: 100,
            ..PotConfig::default()
        });
        assert!(by_rate.is_roundup_collector());
        assert!(by_minimum.is_roundup_collector());
        assert!(!Pot::new("p3", "Plain", 0).is_roundup_collector());
    }
}
