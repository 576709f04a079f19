// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::dashboard;
use crate::commands::budgets::status_label;
use crate::config::Config;
use crate::state::Session;
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table, today};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let session = Session::open(store);
    let ledger = session.ledger();
    let d = dashboard(
        &ledger.accounts,
        &ledger.transactions,
        &ledger.budgets,
        &ledger.goals,
        today(),
    );
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &d)? {
        return Ok(());
    }
    let money = |v: &Decimal| fmt_money(v, &cfg.currency);

    match &ledger.user {
        Some(u) => println!("Welcome, {}!", u.name),
        None => println!("Welcome!"),
    }
    println!(
        "{}",
        pretty_table(
            &["Total balance", "Income this month", "Expense this month", "Month"],
            vec![vec![
                money(&d.total_balance),
                money(&d.month_income),
                money(&d.month_expense),
                d.month.label(),
            ]],
        )
    );

    let recent: Vec<Vec<String>> = d
        .recent
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.category.clone(),
                t.description.clone(),
                money(&t.signed_amount()),
                ledger.account_name(&t.account_id).to_string(),
            ]
        })
        .collect();
    if !recent.is_empty() {
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Description", "Amount", "Account"], recent)
        );
    }

    let budgets: Vec<Vec<String>> = d
        .budgets
        .iter()
        .map(|(b, u)| {
            vec![
                b.category.clone(),
                format!("{} / {}", money(&u.spent), money(&b.limit)),
                fmt_percent(&u.percentage, 0),
                status_label(u.status).to_string(),
            ]
        })
        .collect();
    if !budgets.is_empty() {
        println!("{}", pretty_table(&["Budget", "Spent", "Used", "Status"], budgets));
    }

    let goals: Vec<Vec<String>> = d
        .goals
        .iter()
        .map(|(g, pct)| {
            vec![
                format!("{} {}", g.icon, g.name),
                format!("{} / {}", money(&g.current_amount), money(&g.target_amount)),
                fmt_percent(pct, 1),
            ]
        })
        .collect();
    if !goals.is_empty() {
        println!("{}", pretty_table(&["Goal", "Saved", "Progress"], goals));
    }
    Ok(())
}
