// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneytrail::aggregation::*;
use moneytrail::models::{ExpenseRecord, IncomeRecord, Recurrence, Subscription};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn income(id: i64, amount: i64, date: NaiveDate) -> IncomeRecord {
    IncomeRecord {
        id,
        source: "Salary".into(),
        amount: Decimal::from(amount),
        date,
    }
}

fn expense(id: i64, category: &str, amount: &str, date: NaiveDate) -> ExpenseRecord {
    ExpenseRecord {
        id,
        category: category.into(),
        item: format!("item-{}", id),
        amount: amount.parse().unwrap(),
        date,
    }
}

fn sample_expenses() -> Vec<ExpenseRecord> {
    vec![
        expense(1, "Food", "12.50", d(2024, 3, 2)),
        expense(2, "Transport", "40", d(2024, 3, 5)),
        expense(3, "Food", "7.25", d(2024, 2, 20)),
        expense(4, "Housing", "900", d(2024, 3, 1)),
        expense(5, "Food", "0.25", d(2024, 1, 9)),
    ]
}

#[test]
fn empty_sum_is_zero() {
    let none: Vec<IncomeRecord> = Vec::new();
    assert_eq!(sum_amounts(&none), Decimal::ZERO);
}

#[test]
fn sum_ignores_order() {
    let mut items = sample_expenses();
    let forward = sum_amounts(&items);
    items.reverse();
    assert_eq!(sum_amounts(&items), forward);
    items.swap(0, 3);
    items.swap(1, 4);
    assert_eq!(sum_amounts(&items), forward);
    assert_eq!(forward, "960.00".parse::<Decimal>().unwrap());
}

#[test]
fn category_totals_add_up_to_the_whole() {
    let items = sample_expenses();
    let grouped = group_by_category(&items);
    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped["Food"], "20.00".parse::<Decimal>().unwrap());
    assert_eq!(grouped["Transport"], Decimal::from(40));
    let total: Decimal = grouped.values().copied().sum();
    assert_eq!(total, sum_amounts(&items));
}

#[test]
fn months_are_bucketed_in_order() {
    let incomes = vec![income(1, 3000, d(2024, 3, 1)), income(2, 2500, d(2024, 1, 31))];
    let merged = merge_transactions(&incomes, &sample_expenses());
    let buckets = monthly_summary(&merged);
    let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(months, ["2024-01", "2024-02", "2024-03"]);
    assert_eq!(buckets[0].income, Decimal::from(2500));
    assert_eq!(buckets[0].expense, "0.25".parse::<Decimal>().unwrap());
    assert_eq!(buckets[1].income, Decimal::ZERO);
    assert_eq!(buckets[2].income, Decimal::from(3000));
    assert_eq!(buckets[2].expense, "952.50".parse::<Decimal>().unwrap());
}

#[test]
fn bucketing_is_idempotent_and_order_free() {
    let incomes = vec![income(1, 10, d(2023, 12, 31)), income(2, 20, d(2024, 1, 1))];
    let mut merged = merge_transactions(&incomes, &sample_expenses());
    let first = serde_json::to_string(&monthly_summary(&merged)).unwrap();
    let second = serde_json::to_string(&monthly_summary(&merged)).unwrap();
    assert_eq!(first, second);
    merged.reverse();
    assert_eq!(serde_json::to_string(&monthly_summary(&merged)).unwrap(), first);
}

#[test]
fn bucket_by_month_accepts_custom_accessors() {
    let rows: Vec<(NaiveDate, i64, bool)> = vec![
        (d(2024, 5, 3), 10, true),
        (d(2024, 4, 30), 5, false),
        (d(2024, 5, 20), 1, false),
    ];
    let buckets = bucket_by_month(
        &rows,
        |r: &(NaiveDate, i64, bool)| r.0,
        |r: &(NaiveDate, i64, bool)| Decimal::from(r.1),
        |r: &(NaiveDate, i64, bool)| {
            if r.2 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            }
        },
    );
    assert_eq!(
        buckets,
        vec![
            MonthBucket {
                month: "2024-04".into(),
                income: Decimal::ZERO,
                expense: Decimal::from(5),
            },
            MonthBucket {
                month: "2024-05".into(),
                income: Decimal::from(10),
                expense: Decimal::from(1),
            },
        ]
    );
}

#[test]
fn newer_expense_comes_first() {
    let merged = merge_transactions(
        &[income(1, 100, d(2024, 3, 1))],
        &[expense(9, "Food", "5", d(2024, 3, 2))],
    );
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].kind(), TransactionKind::Expense);
    assert_eq!(merged[1].kind(), TransactionKind::Income);
}

#[test]
fn same_day_keeps_income_first_then_input_order() {
    let day = d(2024, 3, 1);
    let merged = merge_transactions(
        &[income(1, 1, day), income(2, 2, day)],
        &[expense(3, "A", "1", day), expense(4, "B", "1", day)],
    );
    let ids: Vec<(TransactionKind, i64)> = merged
        .iter()
        .map(|t| match t {
            TaggedTransaction::Income(i) => (TransactionKind::Income, i.id),
            TaggedTransaction::Expense(e) => (TransactionKind::Expense, e.id),
        })
        .collect();
    assert_eq!(
        ids,
        vec![
            (TransactionKind::Income, 1),
            (TransactionKind::Income, 2),
            (TransactionKind::Expense, 3),
            (TransactionKind::Expense, 4),
        ]
    );
}

#[test]
fn recent_is_capped() {
    let recent = recent_transactions(
        &[income(1, 100, d(2024, 3, 10))],
        &sample_expenses(),
        3,
    );
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].label(), "Salary");
    assert_eq!(recent[1].label(), "item-2");
}

#[test]
fn month_filter_and_totals() {
    let incomes = vec![income(1, 3000, d(2024, 3, 1)), income(2, 50, d(2024, 2, 1))];
    let expenses = sample_expenses();
    let march_in = in_month(&incomes, 2024, 3);
    let march_out = in_month(&expenses, 2024, 3);
    assert_eq!(march_out.len(), 3);
    let totals = period_totals(&march_in, &march_out);
    assert_eq!(totals.income, Decimal::from(3000));
    assert_eq!(totals.expenses, "952.50".parse::<Decimal>().unwrap());
    assert_eq!(totals.balance, "2047.50".parse::<Decimal>().unwrap());
}

#[test]
fn subscription_totals_split_by_cadence() {
    let sub = |amount: i64, recurrence| Subscription {
        id: 0,
        name: "Svc".into(),
        amount: Decimal::from(amount),
        recurrence,
        next_due_date: d(2024, 1, 1),
        category: "Streaming".into(),
    };
    let totals = subscription_totals(&[
        sub(10, Recurrence::Monthly),
        sub(15, Recurrence::Monthly),
        sub(120, Recurrence::Annual),
    ]);
    assert_eq!(totals.monthly, Decimal::from(25));
    assert_eq!(totals.annual, Decimal::from(120));
}

#[test]
fn aggregation_leaves_inputs_untouched() {
    let items = sample_expenses();
    let before = items.clone();
    let _ = group_by_category(&items);
    let _ = merge_transactions(&[], &items);
    assert_eq!(items, before);
}
