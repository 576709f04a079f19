// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{TransactionFilter, filter_transactions, signed_total};
use crate::config::Config;
use crate::models::{Transaction, TxKind};
use crate::mutate::{self, TransactionDraft};
use crate::state::{Ledger, Session};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_date, pretty_table, today};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: KeyValueStore>(store: &S, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    match m.subcommand() {
        Some(("add", sub)) => add(&mut session, cfg, sub)?,
        Some(("list", sub)) => list(session.ledger(), cfg, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").map(|s| s.trim()).unwrap_or("");
            if session.ledger().transaction(id).is_none() {
                bail!("Transaction '{}' not found", id);
            }
            let next = mutate::delete_transaction(session.ledger(), id);
            session.commit(next);
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore>(
    session: &mut Session<'_, S>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let kind: TxKind = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("")
        .parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let account = sub.get_one::<String>("account").map(String::as_str).unwrap_or("");
    let account_id = id_for_account(session.ledger(), account)?;
    let draft = TransactionDraft {
        kind,
        category: sub.get_one::<String>("category").cloned().unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        description: sub.get_one::<String>("description").cloned().unwrap_or_default(),
        date,
        account_id,
        recurring: sub.get_flag("recurring"),
    };
    session.apply(|l| mutate::add_transaction(l, draft))?;
    let ledger = session.ledger();
    if let Some(tx) = ledger.transactions.first() {
        println!(
            "Recorded {} {} on {} in '{}' (acct: {}) id={}",
            tx.kind,
            fmt_money(&tx.amount, &cfg.currency),
            tx.date,
            tx.category,
            ledger.account_name(&tx.account_id),
            tx.id
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub account: String,
}

/// Ledger entries selected by the `tx list` filters, most recent first.
pub fn matching(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = TransactionFilter {
        search: sub.get_one::<String>("search").cloned(),
        kind: match sub.get_one::<String>("type") {
            Some(t) => Some(t.parse()?),
            None => None,
        },
        category: sub.get_one::<String>("category").cloned(),
    };
    let mut matched = filter_transactions(&ledger.transactions, &filter);
    if let Some(acct) = sub.get_one::<String>("account") {
        let id = id_for_account(ledger, acct)?;
        matched.retain(|t| t.account_id == id);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        matched.truncate(*limit);
    }
    Ok(matched)
}

pub fn query_rows(
    ledger: &Ledger,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    Ok(matching(ledger, sub)?
        .iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            r#type: t.kind.to_string(),
            category: t.category.clone(),
            description: t.description.clone(),
            amount: fmt_money(&t.signed_amount(), &cfg.currency),
            account: ledger.account_name(&t.account_id).to_string(),
        })
        .collect())
}

fn list(ledger: &Ledger, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, cfg, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let total = signed_total(&matching(ledger, sub)?);
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.date,
                    r.r#type,
                    r.category,
                    r.description,
                    r.amount,
                    r.account,
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Description", "Amount", "Account", "Id"],
                rows,
            )
        );
        println!("Total: {}", fmt_money(&total, &cfg.currency));
    }
    Ok(())
}
