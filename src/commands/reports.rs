// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregation::{
    MonthBucket, TaggedTransaction, group_by_category, merge_transactions, monthly_summary,
    period_totals, recent_transactions,
};
use crate::config::AppConfig;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, month_key, month_opt, pretty_table, today};
use anyhow::{Context, Result};
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, cfg, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, cfg, sub)?,
        Some(("by-category", sub)) => by_category(conn, cfg, sub)?,
        Some(("recent", sub)) => recent(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_or_current(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    Ok(month_opt(sub)?.unwrap_or_else(|| {
        let t = today();
        (t.year(), t.month())
    }))
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

pub fn summary_data(conn: &Connection, user: &str, month: (i32, u32)) -> Result<SummaryReport> {
    let incomes = store::list_incomes(conn, user, Some(month))?;
    let expenses = store::list_expenses(conn, user, Some(month))?;
    let totals = period_totals(&incomes, &expenses);
    Ok(SummaryReport {
        month: month_key(month.0, month.1),
        income: totals.income,
        expenses: totals.expenses,
        balance: totals.balance,
    })
}

fn summary(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let report = summary_data(conn, &cfg.user, month_or_current(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let rows = vec![vec![
            report.month.clone(),
            fmt_money(&report.income),
            fmt_money(&report.expenses),
            fmt_money(&report.balance),
        ]];
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
        );
    }
    Ok(())
}

/// The last `months` months that have activity, oldest first.
pub fn cashflow_data(conn: &Connection, user: &str, months: usize) -> Result<Vec<MonthBucket>> {
    let incomes = store::list_incomes(conn, user, None)?;
    let expenses = store::list_expenses(conn, user, None)?;
    let mut buckets = monthly_summary(&merge_transactions(&incomes, &expenses));
    let skip = buckets.len().saturating_sub(months);
    buckets.drain(..skip);
    Ok(buckets)
}

fn cashflow(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let data = cashflow_data(conn, &cfg.user, months)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.month.clone(),
                    fmt_money(&b.income),
                    fmt_money(&b.expense),
                    fmt_money(&(b.income - b.expense)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Share of the period's spending, in percent.
    pub share: Decimal,
}

/// Spending per category for one month, largest first.
pub fn category_data(
    conn: &Connection,
    user: &str,
    month: (i32, u32),
) -> Result<Vec<CategoryShare>> {
    let expenses = store::list_expenses(conn, user, Some(month))?;
    let grouped = group_by_category(&expenses);
    let total: Decimal = grouped.values().copied().sum();
    let mut items: Vec<CategoryShare> = grouped
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total * Decimal::ONE_HUNDRED).round_dp(1)
            },
            category,
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    Ok(items)
}

fn by_category(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let data = category_data(conn, &cfg.user, month)
        .with_context(|| format!("Spending report for {}", month_key(month.0, month.1)))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.amount),
                    format!("{}%", c.share),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }
    Ok(())
}

pub fn recent_data(conn: &Connection, user: &str, limit: usize) -> Result<Vec<TaggedTransaction>> {
    let incomes = store::list_incomes(conn, user, None)?;
    let expenses = store::list_expenses(conn, user, None)?;
    Ok(recent_transactions(&incomes, &expenses, limit))
}

fn recent(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let data = recent_data(conn, &cfg.user, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        use crate::models::Monetary;
        let rows = data
            .iter()
            .map(|t| {
                let amount = match t {
                    TaggedTransaction::Income(_) => format!("+{}", fmt_money(&t.amount())),
                    TaggedTransaction::Expense(_) => format!("-{}", fmt_money(&t.amount())),
                };
                vec![t.date().to_string(), t.label().to_string(), amount]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
    }
    Ok(())
}
