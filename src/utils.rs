// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::MonthKey;
use crate::state::Ledger;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<MonthKey> {
    Ok(s.parse::<MonthKey>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rupiah-style money: `Rp 1.500.000`, `-Rp 12.345,5`. At most two decimals.
pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    let rounded = d
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs().to_string();
    let (int_part, frac_part) = match abs.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (abs.clone(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{}{} {},{}", sign, symbol, grouped, f),
        None => format!("{}{} {}", sign, symbol, grouped),
    }
}

pub fn fmt_percent(d: &Decimal, dp: u32) -> String {
    format!("{}%", d.round_dp(dp).normalize())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Looks an account up by id first, then by exact name.
pub fn id_for_account(ledger: &Ledger, key: &str) -> Result<String> {
    let key = key.trim();
    ledger
        .accounts
        .iter()
        .find(|a| a.id == key)
        .or_else(|| ledger.accounts.iter().find(|a| a.name == key))
        .map(|a| a.id.clone())
        .with_context(|| format!("Account '{}' not found", key))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
