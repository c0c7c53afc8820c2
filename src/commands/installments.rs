// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::InstallmentPlan;
use crate::recurrence::{
    advance_installment, is_installment_plan_complete, monthly_payment, next_installment_date,
    progress_ratio, remaining_balance, remaining_installment_dates,
};
use crate::store;
use crate::utils::{
    fmt_money, maybe_print_json, parse_count, parse_date, parse_decimal, pretty_table, required,
    today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("pay", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing record id")?;
            let plan = pay(conn, &cfg.user, id)?;
            if is_installment_plan_complete(plan.paid_installments, plan.installments_count) {
                println!("'{}' is now fully paid", plan.name);
            } else {
                println!(
                    "Marked installment {}/{} of '{}' as paid; next due {}",
                    plan.paid_installments,
                    plan.installments_count,
                    plan.name,
                    next_installment_date(plan.start_date, plan.paid_installments)
                );
            }
        }
        Some(("edit", sub)) => edit(conn, cfg, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing record id")?;
            store::delete_installment(conn, &cfg.user, id)?;
            println!("Removed installment plan #{}", id);
        }
        Some(("schedule", sub)) => schedule(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

/// Marks the next installment of plan `id` as paid and persists it with a
/// compare-and-swap on the previous counter.
pub fn pay(conn: &Connection, user: &str, id: i64) -> Result<InstallmentPlan> {
    let plan = store::get_installment(conn, user, id)?;
    let next = advance_installment(&plan)?;
    store::set_paid_installments(
        conn,
        user,
        id,
        plan.paid_installments,
        next.paid_installments,
    )?;
    tracing::info!(
        user,
        id,
        paid = next.paid_installments,
        count = next.installments_count,
        "installment paid"
    );
    Ok(next)
}

#[derive(Debug, Serialize)]
pub struct InstallmentView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub total_amount: Decimal,
    pub monthly_payment: Decimal,
    pub paid_installments: u32,
    pub installments_count: u32,
    pub progress: Decimal,
    pub remaining: Decimal,
    /// None once the plan is fully paid.
    pub next_payment: Option<NaiveDate>,
}

pub fn view(plan: &InstallmentPlan) -> InstallmentView {
    let complete = is_installment_plan_complete(plan.paid_installments, plan.installments_count);
    InstallmentView {
        id: plan.id,
        name: plan.name.clone(),
        category: plan.category.clone(),
        total_amount: plan.total_amount,
        monthly_payment: monthly_payment(plan),
        paid_installments: plan.paid_installments,
        installments_count: plan.installments_count,
        progress: progress_ratio(plan.paid_installments, plan.installments_count),
        remaining: remaining_balance(plan),
        next_payment: (!complete)
            .then(|| next_installment_date(plan.start_date, plan.paid_installments)),
    }
}

fn add(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let start_date = match sub.get_one::<String>("start") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let plan = InstallmentPlan {
        id: 0,
        name: required(sub, "name")?.trim().to_string(),
        total_amount: parse_decimal(required(sub, "total")?)?,
        installments_count: parse_count(required(sub, "count")?)?,
        paid_installments: parse_count(required(sub, "paid")?)?,
        start_date,
        category: required(sub, "category")?.trim().to_string(),
    };
    let id = store::insert_installment(conn, &cfg.user, &plan)?;
    println!(
        "Added installment plan #{} '{}': {} x {}",
        id,
        plan.name,
        plan.installments_count,
        fmt_money(&monthly_payment(&plan))
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<InstallmentView> = store::list_installments(conn, &cfg.user)?
        .iter()
        .map(view)
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|v| {
                vec![
                    v.id.to_string(),
                    v.name.clone(),
                    v.category.clone(),
                    fmt_money(&v.monthly_payment),
                    format!("{}/{}", v.paid_installments, v.installments_count),
                    format!("{:.0}%", v.progress * Decimal::ONE_HUNDRED),
                    fmt_money(&v.remaining),
                    v.next_payment
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "paid off".to_string()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Name", "Category", "Monthly", "Paid", "Progress", "Remaining", "Next",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing record id")?;
    let mut plan = store::get_installment(conn, &cfg.user, id)?;
    let expected_paid = plan.paid_installments;
    if let Some(n) = sub.get_one::<String>("name") {
        plan.name = n.trim().to_string();
    }
    if let Some(t) = sub.get_one::<String>("total") {
        plan.total_amount = parse_decimal(t)?;
    }
    if let Some(c) = sub.get_one::<String>("count") {
        plan.installments_count = parse_count(c)?;
    }
    if let Some(p) = sub.get_one::<String>("paid") {
        plan.paid_installments = parse_count(p)?;
    }
    if let Some(s) = sub.get_one::<String>("start") {
        plan.start_date = parse_date(s)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        plan.category = c.trim().to_string();
    }
    store::update_installment(conn, &cfg.user, &plan, expected_paid)?;
    println!("Updated installment plan #{}", id);
    Ok(())
}

fn schedule(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing record id")?;
    let plan = store::get_installment(conn, &cfg.user, id)?;
    let payment = monthly_payment(&plan);
    let dates = remaining_installment_dates(&plan);
    let data: Vec<(u32, NaiveDate, Decimal)> = dates
        .into_iter()
        .zip(plan.paid_installments + 1..)
        .map(|(d, n)| (n, d, payment))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|(n, d, amt)| {
                vec![
                    format!("{}/{}", n, plan.installments_count),
                    d.to_string(),
                    fmt_money(amt),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["#", "Due", "Amount"], rows));
    }
    Ok(())
}
