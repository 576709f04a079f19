// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the ledger.
//!
//! Every function here is pure: the same input always produces the same
//! output and nothing is cached between calls. Empty inputs give zeros or
//! empty sequences. Any percentage whose denominator is zero is zero.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Budget, Goal, MonthKey, Transaction, TxKind};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
/// Utilization at or above this percentage is reported as [`BudgetStatus::Near`].
pub const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Saturating sum; totals pin at the representable bound instead of overflowing.
fn total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyTotals {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Near,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUtilization {
    pub spent: Decimal,
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalsOverview {
    pub total_target: Decimal,
    pub total_saved: Decimal,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountActivity {
    pub income: Decimal,
    pub expense: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    pub income: Decimal,
    pub expense: Decimal,
}

pub fn total_by_type(txs: &[Transaction], kind: TxKind) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount),
    )
}

pub fn total_by_type_for_account(txs: &[Transaction], kind: TxKind, account_id: &str) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.kind == kind && t.account_id == account_id)
            .map(|t| t.amount),
    )
}

pub fn total_by_type_in_month(txs: &[Transaction], kind: TxKind, month: MonthKey) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.kind == kind && month.contains(t.date))
            .map(|t| t.amount),
    )
}

pub fn net_balance(txs: &[Transaction]) -> Decimal {
    total_by_type(txs, TxKind::Income).saturating_sub(total_by_type(txs, TxKind::Expense))
}

/// Income minus expense, signed per transaction type.
pub fn signed_total(txs: &[Transaction]) -> Decimal {
    total(txs.iter().map(Transaction::signed_amount))
}

pub fn count_by_type(txs: &[Transaction], kind: TxKind) -> usize {
    txs.iter().filter(|t| t.kind == kind).count()
}

pub fn percent_of_total(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part.checked_div(whole).and_then(|q| q.checked_mul(HUNDRED)) {
        Some(pct) => pct,
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

pub fn savings_rate(txs: &[Transaction]) -> Decimal {
    percent_of_total(net_balance(txs), total_by_type(txs, TxKind::Income))
}

/// Mean amount over all transactions regardless of type.
pub fn average_amount(txs: &[Transaction]) -> Decimal {
    if txs.is_empty() {
        return Decimal::ZERO;
    }
    total(txs.iter().map(|t| t.amount)) / Decimal::from(txs.len())
}

/// One fold over the ledger; groups come out in first-encounter order.
pub fn group_by_category(txs: &[Transaction], kind: TxKind) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryTotal> = Vec::new();
    for t in txs.iter().filter(|t| t.kind == kind) {
        let slot = *index.entry(t.category.as_str()).or_insert_with(|| {
            groups.push(CategoryTotal {
                category: t.category.clone(),
                total: Decimal::ZERO,
                count: 0,
            });
            groups.len() - 1
        });
        groups[slot].total = groups[slot].total.saturating_add(t.amount);
        groups[slot].count += 1;
    }
    groups
}

/// Top `n` groups by total, descending. Ties keep their input order.
pub fn rank_by_total(groups: &[CategoryTotal], n: usize) -> Vec<CategoryTotal> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(n);
    ranked
}

pub fn monthly_trend(txs: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();
    for t in txs {
        let entry = months
            .entry(MonthKey::of(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TxKind::Income => entry.0 = entry.0.saturating_add(t.amount),
            TxKind::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }
    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            income,
            expense,
        })
        .collect()
}

/// Category spend across the whole ledger; `budget.month` is deliberately not applied.
pub fn budget_spent(budget: &Budget, txs: &[Transaction]) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.kind == TxKind::Expense && t.category == budget.category)
            .map(|t| t.amount),
    )
}

pub fn budget_utilization(budget: &Budget, txs: &[Transaction]) -> BudgetUtilization {
    let spent = budget_spent(budget, txs);
    let percentage = percent_of_total(spent, budget.limit).min(HUNDRED);
    let status = if spent > budget.limit {
        BudgetStatus::Over
    } else if percentage >= NEAR_LIMIT_PERCENT {
        BudgetStatus::Near
    } else {
        BudgetStatus::Ok
    };
    BudgetUtilization {
        spent,
        percentage,
        remaining: budget.limit.saturating_sub(spent).max(Decimal::ZERO),
        status,
    }
}

pub fn budget_overview(budgets: &[Budget], txs: &[Transaction]) -> BudgetOverview {
    let total_limit = total(budgets.iter().map(|b| b.limit));
    let total_spent = total(budgets.iter().map(|b| budget_spent(b, txs)));
    BudgetOverview {
        total_limit,
        total_spent,
        total_remaining: total_limit.saturating_sub(total_spent),
    }
}

pub fn goal_progress(goal: &Goal) -> Decimal {
    percent_of_total(goal.current_amount, goal.target_amount)
}

pub fn goal_completed(goal: &Goal) -> bool {
    goal.current_amount >= goal.target_amount
}

pub fn goal_remaining(goal: &Goal) -> Decimal {
    goal.target_amount.saturating_sub(goal.current_amount)
}

/// Whole days from `today` to the deadline; zero or negative once it has passed.
pub fn days_until_deadline(goal: &Goal, today: NaiveDate) -> i64 {
    (goal.deadline - today).num_days()
}

pub fn goals_overview(goals: &[Goal]) -> GoalsOverview {
    GoalsOverview {
        total_target: total(goals.iter().map(|g| g.target_amount)),
        total_saved: total(goals.iter().map(|g| g.current_amount)),
        completed: goals.iter().filter(|g| goal_completed(g)).count(),
    }
}

pub fn total_balance(accounts: &[Account]) -> Decimal {
    total(accounts.iter().map(|a| a.balance))
}

pub fn account_activity(account_id: &str, txs: &[Transaction]) -> AccountActivity {
    AccountActivity {
        income: total_by_type_for_account(txs, TxKind::Income, account_id),
        expense: total_by_type_for_account(txs, TxKind::Expense, account_id),
        transaction_count: txs.iter().filter(|t| t.account_id == account_id).count(),
    }
}

/// Distinct categories in encounter order.
pub fn categories(txs: &[Transaction]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for t in txs {
        if !seen.iter().any(|c| c == &t.category) {
            seen.push(t.category.clone());
        }
    }
    seen
}

pub fn category_comparison(txs: &[Transaction]) -> Vec<CategoryComparison> {
    let income = group_by_category(txs, TxKind::Income);
    let expense = group_by_category(txs, TxKind::Expense);
    let lookup = |groups: &[CategoryTotal], cat: &str| {
        groups
            .iter()
            .find(|g| g.category == cat)
            .map(|g| g.total)
            .unwrap_or(Decimal::ZERO)
    };
    // Expense categories first, then income-only ones.
    let mut names: Vec<&str> = expense.iter().map(|g| g.category.as_str()).collect();
    for g in &income {
        if !names.contains(&g.category.as_str()) {
            names.push(g.category.as_str());
        }
    }
    names
        .into_iter()
        .map(|cat| CategoryComparison {
            category: cat.to_string(),
            income: lookup(&income, cat),
            expense: lookup(&expense, cat),
        })
        .collect()
}

/// Leading `n` transactions of the ledger, which is kept most-recent-first.
pub fn recent(txs: &[Transaction], n: usize) -> &[Transaction] {
    &txs[..n.min(txs.len())]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of description or category.
    pub search: Option<String>,
    pub kind: Option<TxKind>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                t.description.to_lowercase().contains(&term)
                    || t.category.to_lowercase().contains(&term)
            }
        };
        let kind_ok = self.kind.is_none_or(|k| k == t.kind);
        let category_ok = self.category.as_deref().is_none_or(|c| c == t.category);
        search_ok && kind_ok && category_ok
    }
}

pub fn filter_transactions(txs: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    txs.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Figures for the landing view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_balance: Decimal,
    pub month: MonthKey,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub recent: Vec<Transaction>,
    pub budgets: Vec<(Budget, BudgetUtilization)>,
    pub goals: Vec<(Goal, Decimal)>,
}

pub const DASHBOARD_RECENT: usize = 5;

pub fn dashboard(
    accounts: &[Account],
    txs: &[Transaction],
    budgets: &[Budget],
    goals: &[Goal],
    today: NaiveDate,
) -> Dashboard {
    let month = MonthKey::of(today);
    Dashboard {
        total_balance: total_balance(accounts),
        month,
        month_income: total_by_type_in_month(txs, TxKind::Income, month),
        month_expense: total_by_type_in_month(txs, TxKind::Expense, month),
        total_income: total_by_type(txs, TxKind::Income),
        total_expense: total_by_type(txs, TxKind::Expense),
        recent: recent(txs, DASHBOARD_RECENT).to_vec(),
        budgets: budgets
            .iter()
            .map(|b| (b.clone(), budget_utilization(b, txs)))
            .collect(),
        goals: goals.iter().map(|g| (g.clone(), goal_progress(g))).collect(),
    }
}

/// Figures for the reports view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub average_amount: Decimal,
    pub monthly: Vec<MonthlyTotals>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub top_expenses: Vec<CategoryTotal>,
}

pub const REPORT_TOP_N: usize = 5;

pub fn report(txs: &[Transaction]) -> Report {
    let expense_by_category = group_by_category(txs, TxKind::Expense);
    Report {
        total_income: total_by_type(txs, TxKind::Income),
        total_expense: total_by_type(txs, TxKind::Expense),
        net: net_balance(txs),
        savings_rate: savings_rate(txs),
        income_count: count_by_type(txs, TxKind::Income),
        expense_count: count_by_type(txs, TxKind::Expense),
        average_amount: average_amount(txs),
        monthly: monthly_trend(txs),
        top_expenses: rank_by_total(&expense_by_category, REPORT_TOP_N),
        income_by_category: group_by_category(txs, TxKind::Income),
        expense_by_category,
    }
}
