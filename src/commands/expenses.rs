// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::ExpenseRecord;
use crate::store;
use crate::utils::{
    fmt_money, maybe_print_json, month_opt, parse_date, parse_decimal, pretty_table, required,
    today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("edit", sub)) => edit(conn, cfg, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing record id")?;
            store::delete_expense(conn, &cfg.user, id)?;
            println!("Removed expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let rec = ExpenseRecord {
        id: 0,
        category: required(sub, "category")?.trim().to_string(),
        item: required(sub, "item")?.trim().to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        date,
    };
    let id = store::insert_expense(conn, &cfg.user, &rec)?;
    println!(
        "Recorded expense #{}: {} for '{}' ({}) on {}",
        id,
        fmt_money(&rec.amount),
        rec.item,
        rec.category,
        rec.date
    );
    Ok(())
}

/// Expenses for the `list` subcommand, honoring `--month` and `--category`.
pub fn query_rows(
    conn: &Connection,
    user: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRecord>> {
    let mut data = store::list_expenses(conn, user, month_opt(sub)?)?;
    if let Some(cat) = sub.get_one::<String>("category") {
        data.retain(|e| e.category.eq_ignore_ascii_case(cat.trim()));
    }
    Ok(data)
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, &cfg.user, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    r.category.clone(),
                    r.item.clone(),
                    fmt_money(&r.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Item", "Amount"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing record id")?;
    let mut rec = store::get_expense(conn, &cfg.user, id)?;
    if let Some(c) = sub.get_one::<String>("category") {
        rec.category = c.trim().to_string();
    }
    if let Some(i) = sub.get_one::<String>("item") {
        rec.item = i.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        rec.amount = parse_decimal(a)?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        rec.date = parse_date(d)?;
    }
    store::update_expense(conn, &cfg.user, &rec)?;
    println!("Updated expense #{}", id);
    Ok(())
}
