// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    days_until_deadline, goal_completed, goal_progress, goal_remaining, goals_overview,
};
use crate::config::Config;
use crate::mutate::{self, GoalDraft};
use crate::state::{Ledger, Session};
use crate::store::KeyValueStore;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_decimal, pretty_table, today,
};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    match m.subcommand() {
        Some(("add", sub)) => {
            let deadline = match sub.get_one::<String>("deadline") {
                Some(d) => Some(parse_date(d)?),
                None => None,
            };
            let draft = GoalDraft {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                target: sub.get_one::<String>("target").cloned().unwrap_or_default(),
                current: sub.get_one::<String>("current").cloned().unwrap_or_default(),
                deadline,
                icon: sub.get_one::<String>("icon").cloned(),
            };
            session.apply(|l| mutate::add_goal(l, draft))?;
            if let Some(g) = session.ledger().goals.last() {
                println!(
                    "Added goal {} '{}' target {} by {} id={}",
                    g.icon,
                    g.name,
                    fmt_money(&g.target_amount, &cfg.currency),
                    g.deadline,
                    g.id
                );
            }
        }
        Some(("list", sub)) => list(session.ledger(), cfg, sub, today())?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").map(|s| s.trim()).unwrap_or("");
            if session.ledger().goal(id).is_none() {
                bail!("Goal '{}' not found", id);
            }
            let next = mutate::delete_goal(session.ledger(), id);
            session.commit(next);
            println!("Removed goal {}", id);
        }
        Some(("contribute", sub)) => {
            let id = sub.get_one::<String>("id").map(|s| s.trim()).unwrap_or("");
            let amount = match sub.get_one::<u8>("preset") {
                Some(p) => Decimal::from(mutate::CONTRIBUTION_PRESETS[usize::from(*p) - 1]),
                None => parse_decimal(
                    sub.get_one::<String>("amount")
                        .map(String::as_str)
                        .unwrap_or(""),
                )?,
            };
            if session.ledger().goal(id).is_none() {
                bail!("Goal '{}' not found", id);
            }
            session.apply(|l| mutate::contribute_to_goal(l, id, amount))?;
            if let Some(g) = session.ledger().goal(id) {
                println!(
                    "{} '{}': {} of {} ({})",
                    g.icon,
                    g.name,
                    fmt_money(&g.current_amount, &cfg.currency),
                    fmt_money(&g.target_amount, &cfg.currency),
                    fmt_percent(&goal_progress(g), 1)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub saved: String,
    pub target: String,
    pub remaining: String,
    pub progress: String,
    pub deadline: String,
    pub days_left: i64,
    pub completed: bool,
}

pub fn goal_rows(ledger: &Ledger, cfg: &Config, today: NaiveDate) -> Vec<GoalRow> {
    ledger
        .goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.clone(),
            icon: g.icon.clone(),
            name: g.name.clone(),
            saved: fmt_money(&g.current_amount, &cfg.currency),
            target: fmt_money(&g.target_amount, &cfg.currency),
            remaining: fmt_money(&goal_remaining(g), &cfg.currency),
            progress: fmt_percent(&goal_progress(g), 1),
            deadline: g.deadline.to_string(),
            days_left: days_until_deadline(g, today),
            completed: goal_completed(g),
        })
        .collect()
}

fn deadline_label(days_left: i64) -> String {
    if days_left > 0 {
        format!("{} days left", days_left)
    } else {
        "deadline passed".to_string()
    }
}

fn list(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let data = goal_rows(ledger, cfg, today);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                let when = if r.completed {
                    "reached".to_string()
                } else {
                    deadline_label(r.days_left)
                };
                vec![
                    format!("{} {}", r.icon, r.name),
                    r.saved,
                    r.target,
                    r.remaining,
                    r.progress,
                    r.deadline,
                    when,
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Goal", "Saved", "Target", "Left", "Progress", "Deadline", "Status", "Id"],
                rows
            )
        );
        let overview = goals_overview(&ledger.goals);
        println!(
            "Saved {} of {} across {} goals, {} reached",
            fmt_money(&overview.total_saved, &cfg.currency),
            fmt_money(&overview.total_target, &cfg.currency),
            ledger.goals.len(),
            overview.completed
        );
    }
    Ok(())
}
