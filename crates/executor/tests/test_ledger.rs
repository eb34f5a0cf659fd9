//! Tests for the speculative ledger's overlay bookkeeping and label scoping.
//!
//! All money values are i64 minor units (pence).

use chrono::NaiveDate;
use core_types::{AccountSnapshot, Account, Endpoint, Pot, PotConfig};
use executor::{ExecutorError, Ledger, DEFAULT_LABEL};
use proptest::prelude::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn pot_with_minimum(id: &str, balance: i64, minimum: i64) -> Pot {
    Pot::new(id, id, balance).with_config(PotConfig {
        minimum_amount: minimum,
        ..PotConfig::default()
    })
}

#[test]
fn test_untouched_pots_report_their_real_balance() {
    let pot = pot_with_minimum("bills", 12_000, 10_000);
    let ledger = Ledger::new("acc_1", 5_000, vec![pot.clone()], date());

    assert_eq!(ledger.get_balance(&pot), 12_000);
    assert_eq!(ledger.get_factored_balance(&pot), 2_000);
    assert_eq!(ledger.account_balance(), 5_000);
    assert!(ledger.transfers().is_empty());
}

#[test]
fn test_transfer_updates_both_overlays() {
    let src = pot_with_minimum("salary", 50_000, 10_000);
    let dest = pot_with_minimum("bills", 1_000, 5_000);
    let mut ledger = Ledger::new("acc_1", 0, vec![src.clone(), dest.clone()], date());

    assert!(ledger.propose_transfer(&src, &dest, 4_000));

    assert_eq!(ledger.get_balance(&src), 46_000);
    assert_eq!(ledger.get_factored_balance(&src), 36_000);
    assert_eq!(ledger.get_balance(&dest), 5_000);
    assert_eq!(ledger.get_factored_balance(&dest), 0);

    let transfer = &ledger.transfers()[0];
    assert_eq!(transfer.label, DEFAULT_LABEL);
    assert_eq!(transfer.source, Endpoint::pot(&src));
    assert_eq!(transfer.destination, Endpoint::pot(&dest));
    assert_eq!(transfer.amount, 4_000);
}

#[test]
fn test_insufficient_source_is_silently_dropped() {
    let src = Pot::new("src", "Source", 300);
    let dest = Pot::new("dest", "Dest", 0);
    let mut ledger = Ledger::new("acc_1", 0, vec![src.clone(), dest.clone()], date());

    assert!(!ledger.propose_transfer(&src, &dest, 301));
    assert!(ledger.transfers().is_empty());
    assert_eq!(ledger.get_balance(&src), 300);

    // Exactly the balance is allowed.
    assert!(ledger.propose_transfer(&src, &dest, 300));
    assert_eq!(ledger.get_balance(&src), 0);
}

#[test]
fn test_guard_uses_provisional_not_real_balance() {
    let src = Pot::new("src", "Source", 1_000);
    let a = Pot::new("a", "A", 0);
    let b = Pot::new("b", "B", 0);
    let mut ledger = Ledger::new("acc_1", 0, vec![src.clone(), a.clone(), b.clone()], date());

    assert!(ledger.propose_transfer(&src, &a, 700));
    // The real balance would cover 500, the provisional one (300) does not.
    assert!(!ledger.propose_transfer(&src, &b, 500));
    assert_eq!(ledger.transfers().len(), 1);
}

#[test]
fn test_zero_amount_and_self_transfer_are_rejected() {
    let src = Pot::new("src", "Source", 1_000);
    let dest = Pot::new("dest", "Dest", 0);
    let mut ledger = Ledger::new("acc_1", 0, vec![src.clone(), dest.clone()], date());

    assert!(!ledger.propose_transfer(&src, &dest, 0));
    assert!(!ledger.propose_transfer(&src, &dest, -5));
    assert!(!ledger.propose_transfer(&src, &src, 10));
    assert!(ledger.transfers().is_empty());
}

#[test]
fn test_withdrawal_and_deposit_move_account_balance() {
    let pot = Pot::new("pot", "Pot", 2_000);
    let mut ledger = Ledger::new("acc_1", 1_000, vec![pot.clone()], date());

    assert!(ledger.propose_withdrawal(&pot, 500));
    assert_eq!(ledger.account_balance(), 1_500);
    assert_eq!(ledger.get_balance(&pot), 1_500);

    assert!(!ledger.propose_deposit(&pot, 1_501));
    assert!(ledger.propose_deposit(&pot, 1_500));
    assert_eq!(ledger.account_balance(), 0);
    assert_eq!(ledger.get_balance(&pot), 3_000);

    assert!(!ledger.propose_withdrawal(&pot, 3_001));
    assert_eq!(ledger.transfers().len(), 2);
    assert_eq!(ledger.transfers()[0].destination, Endpoint::Account);
    assert_eq!(ledger.transfers()[1].source, Endpoint::Account);
}

#[test]
fn test_label_scope_tags_and_restores() {
    let src = Pot::new("src", "Source", 1_000);
    let dest = Pot::new("dest", "Dest", 0);
    let mut ledger = Ledger::new("acc_1", 0, vec![], date());

    {
        let mut scoped = ledger.with_label("PMP");
        assert_eq!(scoped.label(), "PMP");
        scoped.propose_transfer(&src, &dest, 100);
    }
    ledger.propose_transfer(&src, &dest, 100);

    assert_eq!(ledger.label(), DEFAULT_LABEL);
    assert_eq!(ledger.transfers()[0].label, "PMP");
    assert_eq!(ledger.transfers()[1].label, DEFAULT_LABEL);
}

#[test]
fn test_nested_label_scopes_restore_the_outer_label() {
    let mut ledger = Ledger::new("acc_1", 0, vec![], date());
    {
        let mut outer = ledger.with_label("SPP");
        {
            let inner = outer.with_label("RP");
            assert_eq!(inner.label(), "RP");
        }
        assert_eq!(outer.label(), "SPP");
    }
    assert_eq!(ledger.label(), DEFAULT_LABEL);
}

#[test]
fn test_label_is_restored_after_a_panic_inside_the_scope() {
    let src = Pot::new("src", "Source", 1_000);
    let dest = Pot::new("dest", "Dest", 0);
    let mut ledger = Ledger::new("acc_1", 0, vec![], date());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut scoped = ledger.with_label("PGP");
        scoped.propose_transfer(&src, &dest, 100);
        panic!("rule blew up");
    }));
    assert!(result.is_err());

    assert_eq!(ledger.label(), DEFAULT_LABEL);
    ledger.propose_transfer(&src, &dest, 100);
    assert_eq!(ledger.transfers()[1].label, DEFAULT_LABEL);
}

#[test]
fn test_snapshot_without_balance_is_rejected() {
    let snapshot = AccountSnapshot {
        account: Account {
            id: "acc_1".to_string(),
            description: "Current".to_string(),
            closed: false,
        },
        balance: None,
        pots: vec![],
        fetched_at: chrono::Utc::now(),
    };
    let err = Ledger::from_snapshot(snapshot, date()).unwrap_err();
    assert!(matches!(err, ExecutorError::NoBalance(id) if id == "acc_1"));
}

proptest! {
    /// get_balance always equals the real balance plus the signed sum of accepted proposals.
    #[test]
    fn prop_balance_is_real_plus_signed_sum(
        balances in proptest::collection::vec(0i64..50_000, 4),
        moves in proptest::collection::vec((0usize..4, 0usize..4, 1i64..20_000), 0..40),
    ) {
        let pots: Vec<Pot> = balances
            .iter()
            .enumerate()
            .map(|(i, b)| Pot::new(format!("p{i}"), format!("Pot {i}"), *b))
            .collect();
        let mut ledger = Ledger::new("acc", 0, pots.clone(), date());
        let mut expected = balances.clone();

        for (from, to, amount) in moves {
            if ledger.propose_transfer(&pots[from], &pots[to], amount) {
                expected[from] -= amount;
                expected[to] += amount;
            }
        }

        for (pot, want) in pots.iter().zip(expected) {
            prop_assert_eq!(ledger.get_balance(pot), want);
            prop_assert!(ledger.get_balance(pot) >= 0);
        }
    }
}
