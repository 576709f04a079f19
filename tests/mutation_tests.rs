// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dompet::error::ValidationError;
use dompet::models::{AccountKind, MonthKey, TxKind};
use dompet::mutate::{self, AccountDraft, BudgetDraft, GoalDraft, TransactionDraft};
use dompet::state::{Ledger, default_accounts};
use rust_decimal::Decimal;

fn ledger() -> Ledger {
    Ledger {
        accounts: default_accounts(),
        ..Default::default()
    }
}

fn draft(kind: TxKind, amount: &str, account: &str) -> TransactionDraft {
    TransactionDraft {
        kind,
        category: "Makanan".into(),
        amount: amount.into(),
        description: "Nasi goreng".into(),
        date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        account_id: account.into(),
        recurring: false,
    }
}

fn balance(l: &Ledger, id: &str) -> Decimal {
    l.account(id).unwrap().balance
}

#[test]
fn add_then_delete_restores_balance() {
    let l0 = ledger();
    let l1 = mutate::add_transaction(&l0, draft(TxKind::Income, "1000000", "1")).unwrap();
    assert_eq!(balance(&l1, "1"), Decimal::from(1_000_000));
    assert_eq!(l1.transactions.len(), 1);

    let id = l1.transactions[0].id.clone();
    let l2 = mutate::delete_transaction(&l1, &id);
    assert!(balance(&l2, "1").is_zero());
    assert!(l2.transactions.is_empty());
    assert_eq!(l2.accounts, l0.accounts);
}

#[test]
fn balance_tracks_signed_sum_over_a_sequence() {
    let mut l = ledger();
    let steps = [
        (TxKind::Income, "500000"),
        (TxKind::Expense, "120000"),
        (TxKind::Expense, "30000.50"),
        (TxKind::Income, "75000"),
    ];
    for (kind, amount) in steps {
        l = mutate::add_transaction(&l, draft(kind, amount, "2")).unwrap();
    }
    let victim = l.transactions[1].id.clone();
    l = mutate::delete_transaction(&l, &victim);

    let expected: Decimal = l
        .transactions
        .iter()
        .filter(|t| t.account_id == "2")
        .map(|t| t.signed_amount())
        .sum();
    assert_eq!(balance(&l, "2"), expected);
    assert!(balance(&l, "1").is_zero());
}

#[test]
fn transactions_are_prepended_with_unique_ids() {
    let mut l = ledger();
    for i in 0..50 {
        l = mutate::add_transaction(&l, draft(TxKind::Expense, &i.to_string(), "1")).unwrap();
    }
    assert_eq!(l.transactions[0].amount, Decimal::from(49));
    let mut ids: Vec<&str> = l.transactions.iter().map(|t| t.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn invalid_drafts_leave_ledger_untouched() {
    let l = ledger();
    let cases = [
        (draft(TxKind::Expense, "", "1"), ValidationError::MissingField("amount")),
        (draft(TxKind::Expense, "abc", "1"), ValidationError::InvalidAmount("abc".into())),
        (draft(TxKind::Expense, "-5", "1"), ValidationError::InvalidAmount("-5".into())),
        (draft(TxKind::Expense, "10", " "), ValidationError::MissingField("account")),
    ];
    for (d, expected) in cases {
        assert_eq!(mutate::add_transaction(&l, d).unwrap_err(), expected);
    }
    let mut no_category = draft(TxKind::Income, "10", "1");
    no_category.category = String::new();
    assert_eq!(
        mutate::add_transaction(&l, no_category).unwrap_err(),
        ValidationError::MissingField("category")
    );
    let mut no_description = draft(TxKind::Income, "10", "1");
    no_description.description = "   ".into();
    assert!(mutate::add_transaction(&l, no_description).is_err());
    assert_eq!(l, ledger());
}

#[test]
fn orphaned_account_is_tolerated() {
    let l0 = ledger();
    let l1 = mutate::add_transaction(&l0, draft(TxKind::Expense, "100", "ghost")).unwrap();
    assert_eq!(l1.accounts, l0.accounts);
    assert_eq!(l1.account_name("ghost"), "unknown account");

    // Deleting the account keeps its transactions; deleting those skips the reversal.
    let l2 = mutate::add_transaction(&l1, draft(TxKind::Expense, "40", "3")).unwrap();
    let l3 = mutate::delete_account(&l2, "3");
    assert_eq!(l3.transactions.len(), 2);
    assert!(l3.account("3").is_none());
    let id = l3.transactions[0].id.clone();
    let l4 = mutate::delete_transaction(&l3, &id);
    assert_eq!(l4.accounts, l3.accounts);
    assert_eq!(l4.transactions.len(), 1);
}

#[test]
fn deleting_unknown_ids_is_a_noop() {
    let l = ledger();
    assert_eq!(mutate::delete_transaction(&l, "nope"), l);
    assert_eq!(mutate::delete_budget(&l, "nope"), l);
    assert_eq!(mutate::delete_goal(&l, "nope"), l);
    assert_eq!(mutate::delete_account(&l, "nope"), l);
}

#[test]
fn add_account_parses_signed_balance() {
    let l = mutate::add_account(
        &ledger(),
        AccountDraft {
            name: "Mandiri".into(),
            kind: AccountKind::Bank,
            balance: "-25000".into(),
            color: None,
        },
    )
    .unwrap();
    let acct = l.accounts.last().unwrap();
    assert_eq!(acct.balance, Decimal::from(-25_000));
    assert_eq!(acct.color, mutate::DEFAULT_ACCOUNT_COLOR);

    let err = mutate::add_account(
        &ledger(),
        AccountDraft {
            name: "".into(),
            kind: AccountKind::Cash,
            balance: "0".into(),
            color: None,
        },
    )
    .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("name"));
}

#[test]
fn budgets_require_positive_limit() {
    let month = MonthKey::new(2025, 1).unwrap();
    let ok = mutate::add_budget(
        &ledger(),
        BudgetDraft {
            category: "Makanan".into(),
            limit: "2000000".into(),
            month,
        },
    )
    .unwrap();
    assert_eq!(ok.budgets.len(), 1);
    assert_eq!(ok.budgets[0].month, month);

    let zero = mutate::add_budget(
        &ledger(),
        BudgetDraft {
            category: "Makanan".into(),
            limit: "0".into(),
            month,
        },
    );
    assert!(matches!(zero, Err(ValidationError::NotPositive { field: "limit", .. })));

    let id = ok.budgets[0].id.clone();
    assert!(mutate::delete_budget(&ok, &id).budgets.is_empty());
}

fn goal_draft(target: &str, current: &str) -> GoalDraft {
    GoalDraft {
        name: "Liburan".into(),
        target: target.into(),
        current: current.into(),
        deadline: NaiveDate::from_ymd_opt(2025, 12, 31),
        icon: None,
    }
}

#[test]
fn contribution_is_clamped_to_target() {
    let l = mutate::add_goal(&ledger(), goal_draft("1000000", "900000")).unwrap();
    let id = l.goals[0].id.clone();
    assert_eq!(l.goals[0].icon, mutate::DEFAULT_GOAL_ICON);

    let l = mutate::contribute_to_goal(&l, &id, Decimal::from(500_000)).unwrap();
    assert_eq!(l.goals[0].current_amount, Decimal::from(1_000_000));

    let l = mutate::contribute_to_goal(&l, &id, Decimal::from(100_000)).unwrap();
    assert_eq!(l.goals[0].current_amount, l.goals[0].target_amount);

    assert!(mutate::contribute_to_goal(&l, &id, Decimal::from(-1)).is_err());
    assert_eq!(mutate::contribute_to_goal(&l, "missing", Decimal::ONE).unwrap(), l);
}

#[test]
fn goal_creation_defaults_and_validation() {
    let l = mutate::add_goal(&ledger(), goal_draft("500", "")).unwrap();
    assert!(l.goals[0].current_amount.is_zero());

    let clamped = mutate::add_goal(&ledger(), goal_draft("500", "800")).unwrap();
    assert_eq!(clamped.goals[0].current_amount, Decimal::from(500));

    let mut no_deadline = goal_draft("500", "");
    no_deadline.deadline = None;
    assert_eq!(
        mutate::add_goal(&ledger(), no_deadline).unwrap_err(),
        ValidationError::MissingField("deadline")
    );
    assert!(mutate::add_goal(&ledger(), goal_draft("0", "")).is_err());
    assert!(mutate::add_goal(&ledger(), goal_draft("", "")).is_err());
}

const MAX_AMOUNT: &str = "79228162514264337593543950335";

#[test]
fn balance_overflow_is_rejected_without_side_effects() {
    let l1 = mutate::add_transaction(&ledger(), draft(TxKind::Income, MAX_AMOUNT, "1")).unwrap();
    assert_eq!(balance(&l1, "1"), Decimal::MAX);

    let err = mutate::add_transaction(&l1, draft(TxKind::Income, "1", "1")).unwrap_err();
    assert_eq!(err, ValidationError::Overflow("balance"));
    assert_eq!(l1.transactions.len(), 1);
    assert_eq!(balance(&l1, "1"), Decimal::MAX);

    // Expenses still apply and can be reversed.
    let l2 = mutate::add_transaction(&l1, draft(TxKind::Expense, "10", "1")).unwrap();
    let id = l2.transactions[0].id.clone();
    let l3 = mutate::delete_transaction(&l2, &id);
    assert_eq!(balance(&l3, "1"), Decimal::MAX);
}

#[test]
fn contribution_near_the_decimal_limit_clamps() {
    let l = mutate::add_goal(
        &ledger(),
        GoalDraft {
            name: "Semua".into(),
            target: MAX_AMOUNT.into(),
            current: "79228162514264337593543950000".into(),
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1),
            icon: None,
        },
    )
    .unwrap();
    let id = l.goals[0].id.clone();
    let l = mutate::contribute_to_goal(&l, &id, Decimal::MAX).unwrap();
    assert_eq!(l.goals[0].current_amount, Decimal::MAX);
}
