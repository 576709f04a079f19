// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    /// Signed effect of `amount` on an account balance.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TxKind::Income => amount,
            TxKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TxKind::Income),
            "expense" | "out" => Ok(TxKind::Expense),
            other => Err(ValidationError::UnknownVariant {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Cash,
    Bank,
    Ewallet,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Cash => "cash",
            AccountKind::Bank => "bank",
            AccountKind::Ewallet => "ewallet",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(AccountKind::Cash),
            "bank" => Ok(AccountKind::Bank),
            "ewallet" | "e-wallet" => Ok(AccountKind::Ewallet),
            other => Err(ValidationError::UnknownVariant {
                field: "account type",
                value: other.to_string(),
            }),
        }
    }
}

/// Calendar month, ordered chronologically (year first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short display label such as `Jan 2025`. Never use it for ordering.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => d.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::InvalidMonth(s.to_string());
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    pub month: MonthKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
