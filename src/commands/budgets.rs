// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{BudgetStatus, budget_overview, budget_utilization};
use crate::config::Config;
use crate::models::MonthKey;
use crate::mutate::{self, BudgetDraft};
use crate::state::{Ledger, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table, today};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    match m.subcommand() {
        Some(("add", sub)) => {
            let month = match sub.get_one::<String>("month") {
                Some(s) => parse_month(s)?,
                None => MonthKey::of(today()),
            };
            let draft = BudgetDraft {
                category: sub.get_one::<String>("category").cloned().unwrap_or_default(),
                limit: sub.get_one::<String>("limit").cloned().unwrap_or_default(),
                month,
            };
            session.apply(|l| mutate::add_budget(l, draft))?;
            if let Some(b) = session.ledger().budgets.last() {
                println!(
                    "Budget set for {} / {} = {} id={}",
                    b.month,
                    b.category,
                    fmt_money(&b.limit, &cfg.currency),
                    b.id
                );
            }
        }
        Some(("list", sub)) => list(session.ledger(), cfg, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").map(|s| s.trim()).unwrap_or("");
            if session.ledger().budget(id).is_none() {
                bail!("Budget '{}' not found", id);
            }
            let next = mutate::delete_budget(session.ledger(), id);
            session.commit(next);
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetRow {
    pub id: String,
    pub month: String,
    pub category: String,
    pub limit: String,
    pub spent: String,
    pub remaining: String,
    pub percentage: String,
    pub status: BudgetStatus,
}

pub fn budget_rows(ledger: &Ledger, cfg: &Config) -> Vec<BudgetRow> {
    ledger
        .budgets
        .iter()
        .map(|b| {
            let u = budget_utilization(b, &ledger.transactions);
            BudgetRow {
                id: b.id.clone(),
                month: b.month.to_string(),
                category: b.category.clone(),
                limit: fmt_money(&b.limit, &cfg.currency),
                spent: fmt_money(&u.spent, &cfg.currency),
                remaining: fmt_money(&u.remaining, &cfg.currency),
                percentage: fmt_percent(&u.percentage, 0),
                status: u.status,
            }
        })
        .collect()
}

pub fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Ok => "ok",
        BudgetStatus::Near => "near limit",
        BudgetStatus::Over => "over budget",
    }
}

fn list(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = budget_rows(ledger, cfg);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.month,
                    r.category,
                    r.limit,
                    r.spent,
                    r.remaining,
                    r.percentage,
                    status_label(r.status).to_string(),
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Category", "Limit", "Spent", "Left", "Used", "Status", "Id"],
                rows
            )
        );
        let overview = budget_overview(&ledger.budgets, &ledger.transactions);
        println!(
            "Total budget: {}  spent: {}  remaining: {}",
            fmt_money(&overview.total_limit, &cfg.currency),
            fmt_money(&overview.total_spent, &cfg.currency),
            fmt_money(&overview.total_remaining, &cfg.currency)
        );
    }
    Ok(())
}
