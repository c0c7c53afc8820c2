// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregation::subscription_totals;
use crate::config::AppConfig;
use crate::models::{Recurrence, Subscription};
use crate::recurrence::{is_overdue, next_subscription_due_date};
use crate::store;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, required, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("advance", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing record id")?;
            let s = advance(conn, &cfg.user, id)?;
            println!("'{}' next due on {}", s.name, s.next_due_date);
        }
        Some(("edit", sub)) => edit(conn, cfg, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing record id")?;
            store::delete_subscription(conn, &cfg.user, id)?;
            println!("Removed subscription #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Moves subscription `id` forward by one billing cycle.
pub fn advance(conn: &Connection, user: &str, id: i64) -> Result<Subscription> {
    let mut sub = store::get_subscription(conn, user, id)?;
    let current = sub.next_due_date;
    let next = next_subscription_due_date(current, sub.recurrence);
    store::set_next_due_date(conn, user, id, current, next)?;
    tracing::info!(user, id, from = %current, to = %next, "subscription advanced");
    sub.next_due_date = next;
    Ok(sub)
}

fn add(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let next_due_date = match sub.get_one::<String>("due") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let s = Subscription {
        id: 0,
        name: required(sub, "name")?.trim().to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        recurrence: required(sub, "recurrence")?.parse::<Recurrence>()?,
        next_due_date,
        category: required(sub, "category")?.trim().to_string(),
    };
    let id = store::insert_subscription(conn, &cfg.user, &s)?;
    println!(
        "Added subscription #{} '{}': {} {} from {}",
        id,
        s.name,
        fmt_money(&s.amount),
        s.recurrence,
        s.next_due_date
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let data = store::list_subscriptions(conn, &cfg.user)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let as_of = today();
        let rows = data
            .iter()
            .map(|s| {
                let due = if is_overdue(s.next_due_date, as_of) {
                    format!("{} (overdue)", s.next_due_date)
                } else {
                    s.next_due_date.to_string()
                };
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    s.category.clone(),
                    fmt_money(&s.amount),
                    s.recurrence.to_string(),
                    due,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Category", "Amount", "Recurrence", "Next due"],
                rows
            )
        );
        let totals = subscription_totals(&data);
        println!(
            "Monthly total: {}   Annual total: {}",
            fmt_money(&totals.monthly),
            fmt_money(&totals.annual)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing record id")?;
    let mut s = store::get_subscription(conn, &cfg.user, id)?;
    if let Some(n) = sub.get_one::<String>("name") {
        s.name = n.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        s.amount = parse_decimal(a)?;
    }
    if let Some(r) = sub.get_one::<String>("recurrence") {
        s.recurrence = r.parse::<Recurrence>()?;
    }
    if let Some(d) = sub.get_one::<String>("due") {
        s.next_due_date = parse_date(d)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        s.category = c.trim().to_string();
    }
    store::update_subscription(conn, &cfg.user, &s)?;
    println!("Updated subscription #{}", id);
    Ok(())
}
