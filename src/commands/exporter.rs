// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::{Ledger, Session};
use crate::store::KeyValueStore;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle<S: KeyValueStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let session = Session::open(store);
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(session.ledger(), sub),
        _ => Ok(()),
    }
}

fn export_transactions(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("--out is required")?;

    // Oldest first, the reverse of the ledger's display order.
    let rows = ledger
        .transactions
        .iter()
        .rev()
        .map(|t| (t, ledger.account_name(&t.account_id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "category",
                "amount",
                "description",
                "account",
                "recurring",
            ])?;
            for (t, account) in rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.description.clone(),
                    account.to_string(),
                    t.recurring.unwrap_or(false).to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .map(|(t, account)| {
                    json!({
                        "id": t.id,
                        "date": t.date.to_string(),
                        "type": t.kind.as_str(),
                        "category": t.category,
                        "amount": t.amount.to_string(),
                        "description": t.description,
                        "account": account,
                        "recurring": t.recurring.unwrap_or(false),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Cannot write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions to {}", ledger.transactions.len(), out);
    Ok(())
}
