// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::IncomeRecord;
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
            store::delete_income(conn, &cfg.user, id)?;
            println!("Removed income #{}", id);
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
    let rec = IncomeRecord {
        id: 0,
        source: required(sub, "source")?.trim().to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        date,
    };
    let id = store::insert_income(conn, &cfg.user, &rec)?;
    println!(
        "Recorded income #{}: {} from '{}' on {}",
        id,
        fmt_money(&rec.amount),
        rec.source,
        rec.date
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let data = store::list_incomes(conn, &cfg.user, month_opt(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    r.source.clone(),
                    fmt_money(&r.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Date", "Source", "Amount"], rows));
    }
    Ok(())
}

fn edit(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("Missing record id")?;
    let mut rec = store::get_income(conn, &cfg.user, id)?;
    if let Some(s) = sub.get_one::<String>("source") {
        rec.source = s.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        rec.amount = parse_decimal(a)?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        rec.date = parse_date(d)?;
    }
    store::update_income(conn, &cfg.user, &rec)?;
    println!("Updated income #{}", id);
    Ok(())
}
