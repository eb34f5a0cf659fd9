use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the allocation rules an account can run.
///
/// The declaration order is the required default composition: each rule may consume
/// surplus that the following ones depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Minimum,
    SavingsPercentage,
    Goal,
    SavingsOverflow,
    Roundup,
}

impl RuleId {
    /// All rules in their default execution order.
    pub const DEFAULT_ORDER: [RuleId; 5] = [
        RuleId::Minimum,
        RuleId::SavingsPercentage,
        RuleId::Goal,
        RuleId::SavingsOverflow,
        RuleId::Roundup,
    ];

    /// The short label attached to every transfer this rule proposes.
    pub fn code(&self) -> &'static str {
        match self {
            RuleId::Minimum => "PMP",
            RuleId::SavingsPercentage => "SPP",
            RuleId::Goal => "PGP",
            RuleId::SavingsOverflow => "SOP",
            RuleId::Roundup => "RP",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Minimum => "minimum",
            RuleId::SavingsPercentage => "savings_percentage",
            RuleId::Goal => "goal",
            RuleId::SavingsOverflow => "savings_overflow",
            RuleId::Roundup => "roundup",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = CoreError;

    /// Accepts either the snake_case name or the transfer label code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        RuleId::DEFAULT_ORDER
            .into_iter()
            .find(|id| id.as_str() == needle || id.code().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::InvalidInput("rule".to_string(), s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("goal".parse::<RuleId>(), Ok(RuleId::Goal));
        assert_eq!("sop".parse::<RuleId>(), Ok(RuleId::SavingsOverflow));
        assert_eq!(" roundup ".parse::<RuleId>(), Ok(RuleId::Roundup));
        assert!("overdraft".parse::<RuleId>().is_err());
    }
}
