use crate::goal::GoalRule;
use crate::minimum::MinimumRule;
use crate::roundup::RoundupRule;
use crate::savings_overflow::SavingsOverflowRule;
use crate::savings_percentage::SavingsPercentageRule;
use crate::Rule;
use core_types::RuleId;

/// Creates a fresh instance of the rule identified by `id`.
///
/// Stateful rules start with empty state, so the first cycle of the round-up rule
/// only records baselines.
pub fn create_rule(id: RuleId) -> Box<dyn Rule> {
    match id {
        RuleId::Minimum => Box::new(MinimumRule::new()),
        RuleId::SavingsPercentage => Box::new(SavingsPercentageRule::new()),
        RuleId::Goal => Box::new(GoalRule::new()),
        RuleId::SavingsOverflow => Box::new(SavingsOverflowRule::new()),
        RuleId::Roundup => Box::new(RoundupRule::new()),
    }
}

/// Creates one rule per id, preserving order.
pub fn create_rules(ids: &[RuleId]) -> Vec<Box<dyn Rule>> {
    ids.iter().copied().map(create_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rules_preserves_order() {
        let rules = create_rules(&RuleId::DEFAULT_ORDER);
        let ids: Vec<RuleId> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids, RuleId::DEFAULT_ORDER.to_vec());
    }
}
