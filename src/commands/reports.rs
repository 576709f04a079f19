// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    CategoryTotal, category_comparison, group_by_category, percent_of_total, rank_by_total, report,
    total_by_type,
};
use crate::config::Config;
use crate::models::TxKind;
use crate::state::{Ledger, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let session = Session::open(store);
    let ledger = session.ledger();
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, cfg, sub)?,
        Some(("monthly", sub)) => monthly(ledger, cfg, sub)?,
        Some(("categories", sub)) => categories(ledger, cfg, sub)?,
        Some(("compare", sub)) => compare(ledger, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let r = report(&ledger.transactions);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &r)? {
        return Ok(());
    }
    let money = |d: &Decimal| fmt_money(d, &cfg.currency);
    let rows = vec![
        vec!["Total income".into(), money(&r.total_income)],
        vec!["Total expense".into(), money(&r.total_expense)],
        vec!["Net".into(), money(&r.net)],
        vec!["Savings rate".into(), fmt_percent(&r.savings_rate, 1)],
        vec!["Income transactions".into(), r.income_count.to_string()],
        vec!["Expense transactions".into(), r.expense_count.to_string()],
        vec!["Average transaction".into(), money(&r.average_amount)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    let top: Vec<Vec<String>> = r
        .top_expenses
        .iter()
        .enumerate()
        .map(|(i, g)| {
            vec![
                (i + 1).to_string(),
                g.category.clone(),
                money(&g.total),
                fmt_percent(&percent_of_total(g.total, r.total_expense), 1),
            ]
        })
        .collect();
    if !top.is_empty() {
        println!("{}", pretty_table(&["#", "Top expense", "Spent", "Share"], top));
    }
    Ok(())
}

fn monthly(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = report(&ledger.transactions).monthly;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|m| {
                vec![
                    m.month.label(),
                    fmt_money(&m.income, &cfg.currency),
                    fmt_money(&m.expense, &cfg.currency),
                    fmt_money(&m.net(), &cfg.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}

/// Category totals for `report categories`, largest first, cut to `--top`.
pub fn ranked_categories(
    ledger: &Ledger,
    sub: &clap::ArgMatches,
) -> Result<(TxKind, Vec<CategoryTotal>)> {
    let kind: TxKind = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse()?;
    let groups = group_by_category(&ledger.transactions, kind);
    let n = sub.get_one::<usize>("top").copied().unwrap_or(groups.len());
    Ok((kind, rank_by_total(&groups, n)))
}

fn categories(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (kind, data) = ranked_categories(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let whole = total_by_type(&ledger.transactions, kind);
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                let avg = if g.count == 0 {
                    Decimal::ZERO
                } else {
                    g.total / Decimal::from(g.count)
                };
                vec![
                    g.category.clone(),
                    fmt_money(&g.total, &cfg.currency),
                    g.count.to_string(),
                    fmt_money(&avg, &cfg.currency),
                    fmt_percent(&percent_of_total(g.total, whole), 1),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Total", "Count", "Average", "Share"], rows)
        );
    }
    Ok(())
}

fn compare(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = category_comparison(&ledger.transactions);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.income, &cfg.currency),
                    fmt_money(&c.expense, &cfg.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Income", "Expense"], rows));
    }
    Ok(())
}
