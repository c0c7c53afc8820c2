// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side summaries over record snapshots. Nothing here touches storage;
//! callers pass in whatever they loaded and may recompute freely.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ExpenseRecord, IncomeRecord, Monetary, Recurrence, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum TaggedTransaction {
    Income(IncomeRecord),
    Expense(ExpenseRecord),
}

impl TaggedTransaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TaggedTransaction::Income(_) => TransactionKind::Income,
            TaggedTransaction::Expense(_) => TransactionKind::Expense,
        }
    }

    /// Income source or expense item.
    pub fn label(&self) -> &str {
        match self {
            TaggedTransaction::Income(i) => &i.source,
            TaggedTransaction::Expense(e) => &e.item,
        }
    }
}

impl Monetary for TaggedTransaction {
    fn amount(&self) -> Decimal {
        match self {
            TaggedTransaction::Income(i) => i.amount,
            TaggedTransaction::Expense(e) => e.amount,
        }
    }
    fn date(&self) -> NaiveDate {
        match self {
            TaggedTransaction::Income(i) => i.date,
            TaggedTransaction::Expense(e) => e.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionTotals {
    pub monthly: Decimal,
    pub annual: Decimal,
}

pub fn sum_amounts<'a, T, I>(records: I) -> Decimal
where
    T: Monetary + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .fold(Decimal::ZERO, |acc, r| acc + r.amount())
}

pub fn group_by_category(expenses: &[ExpenseRecord]) -> BTreeMap<String, Decimal> {
    let mut out = BTreeMap::new();
    for e in expenses {
        *out.entry(e.category.clone()).or_insert(Decimal::ZERO) += e.amount;
    }
    out
}

/// Partitions a mixed sequence by calendar month, ascending.
pub fn bucket_by_month<T>(
    records: &[T],
    date_of: impl Fn(&T) -> NaiveDate,
    amount_of: impl Fn(&T) -> Decimal,
    kind_of: impl Fn(&T) -> TransactionKind,
) -> Vec<MonthBucket> {
    let mut map: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for r in records {
        let d = date_of(r);
        let entry = map
            .entry((d.year(), d.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match kind_of(r) {
            TransactionKind::Income => entry.0 += amount_of(r),
            TransactionKind::Expense => entry.1 += amount_of(r),
        }
    }
    map.into_iter()
        .map(|((y, m), (income, expense))| MonthBucket {
            month: format!("{:04}-{:02}", y, m),
            income,
            expense,
        })
        .collect()
}

pub fn monthly_summary(transactions: &[TaggedTransaction]) -> Vec<MonthBucket> {
    bucket_by_month(
        transactions,
        |t| t.date(),
        |t| t.amount(),
        TaggedTransaction::kind,
    )
}

/// Newest first. Equal dates keep input order, incomes ahead of expenses.
pub fn merge_transactions(
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> Vec<TaggedTransaction> {
    let mut all: Vec<TaggedTransaction> = incomes
        .iter()
        .cloned()
        .map(TaggedTransaction::Income)
        .chain(expenses.iter().cloned().map(TaggedTransaction::Expense))
        .collect();
    // sort_by is stable
    all.sort_by(|a, b| b.date().cmp(&a.date()));
    all
}

pub fn recent_transactions(
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
    limit: usize,
) -> Vec<TaggedTransaction> {
    let mut all = merge_transactions(incomes, expenses);
    all.truncate(limit);
    all
}

pub fn in_month<T: Monetary + Clone>(records: &[T], year: i32, month: u32) -> Vec<T> {
    records
        .iter()
        .filter(|r| {
            let d = r.date();
            d.year() == year && d.month() == month
        })
        .cloned()
        .collect()
}

pub fn period_totals(incomes: &[IncomeRecord], expenses: &[ExpenseRecord]) -> PeriodTotals {
    let income = sum_amounts(incomes);
    let expenses = sum_amounts(expenses);
    PeriodTotals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Sums subscription charges per cadence (not normalised across cadences).
pub fn subscription_totals(subscriptions: &[Subscription]) -> SubscriptionTotals {
    let mut totals = SubscriptionTotals {
        monthly: Decimal::ZERO,
        annual: Decimal::ZERO,
    };
    for s in subscriptions {
        match s.recurrence {
            Recurrence::Monthly => totals.monthly += s.amount,
            Recurrence::Annual => totals.annual += s.amount,
        }
    }
    totals
}
