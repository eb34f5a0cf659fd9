//! Resolves the rule parameters encoded in a pot's name.
//!
//! A pot named `"Bills M:500,MP:2,MTD:25"` is displayed as `"Bills"` and configured
//! with a £500 minimum at priority 2, topped up after the 25th of each month. The
//! configuration is the last space-separated token, a comma-separated list of
//! `FLAG:value` pairs. Unknown flags and malformed pairs are ignored one by one.

use core_types::PotConfig;
use rust_decimal::Decimal;

/// Minor currency units per major unit, for flags expressed in pounds.
const MINOR_UNITS: i64 = 100;

/// The outcome of parsing a raw pot name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPotName {
    pub name: String,
    pub config: PotConfig,
}

/// Splits a raw pot name into its display name and resolved configuration.
pub fn parse_pot_name(raw: &str) -> ResolvedPotName {
    let tokens: Vec<&str> = raw.trim().split(' ').collect();
    let (metadata, name_tokens) = match tokens.split_last() {
        Some((last, rest)) if last.contains(':') => (*last, rest),
        _ => {
            return ResolvedPotName {
                name: raw.to_string(),
                config: PotConfig::default(),
            };
        }
    };

    let mut config = PotConfig::default();
    for pair in metadata.split(',') {
        if !apply_flag(&mut config, pair) {
            tracing::debug!(pot = %raw, pair = %pair, "Ignoring malformed pot configuration pair.");
        }
    }

    ResolvedPotName {
        name: name_tokens.join(" "),
        config,
    }
}

/// Applies a single `FLAG:value` pair. Returns false if it was not understood.
fn apply_flag(config: &mut PotConfig, pair: &str) -> bool {
    let mut parts = pair.split(':');
    let (Some(flag), Some(raw_value), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let Ok(value) = raw_value.trim().parse::<u32>() else {
        return false;
    };

    match flag.trim() {
        "WP" => config.weighted_priority = value,
        "MP" => config.minimum_priority = value,
        "MTD" => config.minimum_transfer_day = value,
        "M" => config.minimum_amount = i64::from(value) * MINOR_UNITS,
        "FP" => config.funding_priority = value,
        "SV" => config.saving_value = percent(value),
        "SP" => config.saving_priority = value,
        "RV" => config.roundup_value = percent(value),
        "RM" => config.roundup_minimum = i64::from(value) * MINOR_UNITS,
        _ => return false,
    }
    true
}

fn percent(value: u32) -> Decimal {
    Decimal::from(value) / Decimal::ONE_HUNDRED
}
