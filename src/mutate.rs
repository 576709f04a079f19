// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! State transitions over a [`Ledger`].
//!
//! Every operation borrows the current ledger and hands back a new one. A
//! rejected draft returns a [`ValidationError`] and leaves the caller's ledger
//! exactly as it was, so an operation either fully applies (including the
//! account balance side effect) or not at all. Removing an id that is not
//! present is a no-op.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{Account, AccountKind, Budget, Goal, MonthKey, Transaction, TxKind};
use crate::state::Ledger;

pub const DEFAULT_ACCOUNT_COLOR: &str = "#3b82f6";
pub const DEFAULT_GOAL_ICON: &str = "🎯";

/// Quick contribution amounts, selected with `goal contribute --preset 1..=3`.
pub const CONTRIBUTION_PRESETS: [i64; 3] = [100_000, 500_000, 1_000_000];

/// Fresh opaque identifier. Collision-free under rapid successive creates.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TxKind,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub date: NaiveDate,
    pub account_id: String,
    pub recurring: bool,
}

#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub name: String,
    pub kind: AccountKind,
    pub balance: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: String,
    pub month: MonthKey,
}

#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub name: String,
    pub target: String,
    pub current: String,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(v.to_string())
}

fn parse_signed(raw: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    raw.parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

/// Parses a non-negative money amount as typed by a user.
pub fn parse_amount(raw: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let d = parse_signed(raw, field)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(ValidationError::InvalidAmount(raw.trim().to_string()));
    }
    Ok(d)
}

fn parse_positive(raw: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let d = parse_amount(raw, field)?;
    if d.is_zero() {
        return Err(ValidationError::NotPositive {
            field,
            value: raw.trim().to_string(),
        });
    }
    Ok(d)
}

/// Adds `delta` to the account with `account_id`. `Ok(false)` on a lookup miss.
fn adjust_balance(
    accounts: &mut [Account],
    account_id: &str,
    delta: Decimal,
) -> Result<bool, ValidationError> {
    match accounts.iter_mut().find(|a| a.id == account_id) {
        Some(acct) => {
            acct.balance = acct
                .balance
                .checked_add(delta)
                .ok_or(ValidationError::Overflow("balance"))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub fn add_transaction(
    ledger: &Ledger,
    draft: TransactionDraft,
) -> Result<Ledger, ValidationError> {
    let category = required(&draft.category, "category")?;
    let amount = parse_amount(&draft.amount, "amount")?;
    let description = required(&draft.description, "description")?;
    let account_id = required(&draft.account_id, "account")?;

    let tx = Transaction {
        id: new_id(),
        kind: draft.kind,
        category,
        amount,
        description,
        date: draft.date,
        account_id,
        recurring: Some(draft.recurring),
    };

    let mut next = ledger.clone();
    if !adjust_balance(&mut next.accounts, &tx.account_id, tx.signed_amount())? {
        tracing::warn!(
            account = %tx.account_id,
            "transaction references unknown account, balance untouched"
        );
    }
    tracing::debug!(id = %tx.id, kind = %tx.kind, amount = %tx.amount, "transaction added");
    next.transactions.insert(0, tx);
    Ok(next)
}

pub fn delete_transaction(ledger: &Ledger, id: &str) -> Ledger {
    let Some(pos) = ledger.transactions.iter().position(|t| t.id == id) else {
        tracing::debug!(id, "delete of unknown transaction ignored");
        return ledger.clone();
    };
    let mut next = ledger.clone();
    let tx = next.transactions.remove(pos);
    // Orphaned references simply skip the reversal.
    if let Some(acct) = next.accounts.iter_mut().find(|a| a.id == tx.account_id) {
        acct.balance = acct.balance.saturating_sub(tx.signed_amount());
    }
    tracing::debug!(id, "transaction deleted");
    next
}

pub fn add_account(ledger: &Ledger, draft: AccountDraft) -> Result<Ledger, ValidationError> {
    let name = required(&draft.name, "name")?;
    let balance = parse_signed(&draft.balance, "balance")?;
    let color = draft
        .color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_ACCOUNT_COLOR.to_string());

    let mut next = ledger.clone();
    next.accounts.push(Account {
        id: new_id(),
        name,
        kind: draft.kind,
        balance,
        color,
    });
    Ok(next)
}

/// Removes the account only. Its transactions keep the dangling reference.
pub fn delete_account(ledger: &Ledger, id: &str) -> Ledger {
    let mut next = ledger.clone();
    next.accounts.retain(|a| a.id != id);
    next
}

pub fn add_budget(ledger: &Ledger, draft: BudgetDraft) -> Result<Ledger, ValidationError> {
    let category = required(&draft.category, "category")?;
    let limit = parse_positive(&draft.limit, "limit")?;

    let mut next = ledger.clone();
    next.budgets.push(Budget {
        id: new_id(),
        category,
        limit,
        month: draft.month,
    });
    Ok(next)
}

pub fn delete_budget(ledger: &Ledger, id: &str) -> Ledger {
    let mut next = ledger.clone();
    next.budgets.retain(|b| b.id != id);
    next
}

pub fn add_goal(ledger: &Ledger, draft: GoalDraft) -> Result<Ledger, ValidationError> {
    let name = required(&draft.name, "name")?;
    let target = parse_positive(&draft.target, "target")?;
    let deadline = draft.deadline.ok_or(ValidationError::MissingField("deadline"))?;
    let current = if draft.current.trim().is_empty() {
        Decimal::ZERO
    } else {
        parse_amount(&draft.current, "current")?
    };
    let icon = draft
        .icon
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GOAL_ICON.to_string());

    let mut next = ledger.clone();
    next.goals.push(Goal {
        id: new_id(),
        name,
        target_amount: target,
        current_amount: current.min(target),
        deadline,
        icon,
    });
    Ok(next)
}

pub fn delete_goal(ledger: &Ledger, id: &str) -> Ledger {
    let mut next = ledger.clone();
    next.goals.retain(|g| g.id != id);
    next
}

/// Adds `amount` to a goal, never past its target.
pub fn contribute_to_goal(
    ledger: &Ledger,
    goal_id: &str,
    amount: Decimal,
) -> Result<Ledger, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    let mut next = ledger.clone();
    if let Some(goal) = next.goals.iter_mut().find(|g| g.id == goal_id) {
        // Saturating is exact here: the result is clamped to the target anyway.
        goal.current_amount = goal
            .current_amount
            .saturating_add(amount)
            .min(goal.target_amount);
        tracing::debug!(goal = goal_id, current = %goal.current_amount, "goal contribution");
    }
    Ok(next)
}
