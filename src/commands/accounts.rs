// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{account_activity, total_balance};
use crate::config::Config;
use crate::models::AccountKind;
use crate::mutate::{self, AccountDraft};
use crate::state::Session;
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: AccountKind = sub
                .get_one::<String>("type")
                .map(String::as_str)
                .unwrap_or("cash")
                .parse()?;
            let draft = AccountDraft {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                kind,
                balance: sub.get_one::<String>("balance").cloned().unwrap_or_default(),
                color: sub.get_one::<String>("color").cloned(),
            };
            session.apply(|l| mutate::add_account(l, draft))?;
            if let Some(acct) = session.ledger().accounts.last() {
                println!(
                    "Added account '{}' ({}, {}) id={}",
                    acct.name,
                    acct.kind,
                    fmt_money(&acct.balance, &cfg.currency),
                    acct.id
                );
            }
        }
        Some(("list", sub)) => list(&session, cfg, sub)?,
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("account").map(String::as_str).unwrap_or("");
            let id = id_for_account(session.ledger(), key)?;
            let next = mutate::delete_account(session.ledger(), &id);
            session.commit(next);
            println!("Removed account '{}'", key);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub balance: String,
    pub income: String,
    pub expense: String,
    pub transactions: usize,
}

pub fn account_rows<S: KeyValueStore>(session: &Session<'_, S>, cfg: &Config) -> Vec<AccountRow> {
    let ledger = session.ledger();
    ledger
        .accounts
        .iter()
        .map(|a| {
            let activity = account_activity(&a.id, &ledger.transactions);
            AccountRow {
                id: a.id.clone(),
                name: a.name.clone(),
                r#type: a.kind.to_string(),
                balance: fmt_money(&a.balance, &cfg.currency),
                income: fmt_money(&activity.income, &cfg.currency),
                expense: fmt_money(&activity.expense, &cfg.currency),
                transactions: activity.transaction_count,
            }
        })
        .collect()
}

fn list<S: KeyValueStore>(
    session: &Session<'_, S>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = account_rows(session, cfg);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id,
                    r.name,
                    r.r#type,
                    r.balance,
                    r.income,
                    r.expense,
                    r.transactions.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Type", "Balance", "Income", "Expense", "Txns"],
                rows
            )
        );
        println!(
            "Total balance: {}",
            fmt_money(&total_balance(&session.ledger().accounts), &cfg.currency)
        );
    }
    Ok(())
}
