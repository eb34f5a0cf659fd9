use configuration::parse_pot_name;
use core_types::PotConfig;
use rust_decimal_macros::dec;

#[test]
fn test_plain_name_uses_defaults() {
    let resolved = parse_pot_name("Holiday Fund");
    assert_eq!(resolved.name, "Holiday Fund");
    assert_eq!(resolved.config, PotConfig::default());
    assert_eq!(resolved.config.weighted_priority, 1);
    assert_eq!(resolved.config.minimum_priority, 1);
}

#[test]
fn test_minimum_flags_are_resolved() {
    let resolved = parse_pot_name("Bills M:500,MP:2,MTD:25");
    assert_eq!(resolved.name, "Bills");
    assert_eq!(resolved.config.minimum_amount, 50_000);
    assert_eq!(resolved.config.minimum_priority, 2);
    assert_eq!(resolved.config.minimum_transfer_day, 25);
}

#[test]
fn test_percentages_become_fractions() {
    let resolved = parse_pot_name("Salary FP:3,SV:20");
    assert_eq!(resolved.config.funding_priority, 3);
    assert_eq!(resolved.config.saving_value, dec!(0.2));

    let roundup = parse_pot_name("Coin Jar RV:10,RM:1");
    assert_eq!(roundup.name, "Coin Jar");
    assert_eq!(roundup.config.roundup_value, dec!(0.1));
    assert_eq!(roundup.config.roundup_minimum, 100);
}

#[test]
fn test_savings_and_weight_flags() {
    let resolved = parse_pot_name("Rainy Day Savings SP:4,WP:3");
    assert_eq!(resolved.name, "Rainy Day Savings");
    assert_eq!(resolved.config.saving_priority, 4);
    assert_eq!(resolved.config.weighted_priority, 3);
}

#[test]
fn test_malformed_pairs_are_skipped_individually() {
    let resolved = parse_pot_name("Car M:abc,FP:2,junk,SP:1:2");
    assert_eq!(resolved.name, "Car");
    assert_eq!(resolved.config.minimum_amount, 0);
    assert_eq!(resolved.config.funding_priority, 2);
    assert_eq!(resolved.config.saving_priority, 0);
}

#[test]
fn test_surrounding_whitespace_is_trimmed_before_splitting() {
    let resolved = parse_pot_name("  Gifts WP:2  ");
    assert_eq!(resolved.name, "Gifts");
    assert_eq!(resolved.config.weighted_priority, 2);
}
