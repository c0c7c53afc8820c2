// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::{InstallmentPlan, Subscription};
use crate::recurrence::{
    is_overdue, monthly_payment, next_subscription_due_date, remaining_installment_dates,
};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};
use anyhow::Result;
use chrono::{NaiveDate, TimeDelta};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    Installment,
    Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub date: NaiveDate,
    pub kind: AgendaKind,
    pub name: String,
    pub amount: Decimal,
    pub overdue: bool,
}

/// Last day of a `days`-long window starting at `from`, saturating at
/// `NaiveDate::MAX`. Negative windows end at `from`.
pub fn window_end(from: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days.max(0))
        .and_then(|span| from.checked_add_signed(span))
        .unwrap_or(NaiveDate::MAX)
}

/// Payments falling in `[from, from + days]`. Subscriptions already past due
/// are listed once at their due date and flagged overdue; upcoming ones are
/// projected forward cycle by cycle.
pub fn agenda_entries(
    plans: &[InstallmentPlan],
    subscriptions: &[Subscription],
    from: NaiveDate,
    days: i64,
) -> Vec<AgendaEntry> {
    let until = window_end(from, days);
    let mut out = Vec::new();

    for plan in plans {
        let payment = monthly_payment(plan);
        for d in remaining_installment_dates(plan) {
            if d > until {
                break;
            }
            out.push(AgendaEntry {
                date: d,
                kind: AgendaKind::Installment,
                name: plan.name.clone(),
                amount: payment,
                overdue: is_overdue(d, from),
            });
        }
    }

    for s in subscriptions {
        let mut due = s.next_due_date;
        if is_overdue(due, from) {
            out.push(AgendaEntry {
                date: due,
                kind: AgendaKind::Subscription,
                name: s.name.clone(),
                amount: s.amount,
                overdue: true,
            });
            continue;
        }
        while due <= until {
            out.push(AgendaEntry {
                date: due,
                kind: AgendaKind::Subscription,
                name: s.name.clone(),
                amount: s.amount,
                overdue: false,
            });
            let next = next_subscription_due_date(due, s.recurrence);
            if next <= due {
                break;
            }
            due = next;
        }
    }

    out.sort_by(|a, b| a.date.cmp(&b.date));
    out
}

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    let from = match m.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let days = *m.get_one::<i64>("days").unwrap_or(&30);
    let plans = store::list_installments(conn, &cfg.user)?;
    let subs = store::list_subscriptions(conn, &cfg.user)?;
    let data = agenda_entries(&plans, &subs, from, days);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("Nothing due between {} and {}", from, window_end(from, days));
            return Ok(());
        }
        let rows = data
            .iter()
            .map(|e| {
                vec![
                    if e.overdue {
                        format!("{} (overdue)", e.date)
                    } else {
                        e.date.to_string()
                    },
                    match e.kind {
                        AgendaKind::Installment => "installment".to_string(),
                        AgendaKind::Subscription => "subscription".to_string(),
                    },
                    e.name.clone(),
                    fmt_money(&e.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Kind", "Name", "Amount"], rows));
    }
    Ok(())
}
