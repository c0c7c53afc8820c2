// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::recurrence::{is_installment_plan_complete, is_overdue};
use crate::store;
use crate::utils::{pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Collects (issue, detail) pairs for the user's records as of `as_of`.
pub fn check(conn: &Connection, user: &str, as_of: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Plans that are paid off but still tracked
    for plan in store::list_installments(conn, user)? {
        if is_installment_plan_complete(plan.paid_installments, plan.installments_count) {
            rows.push(vec![
                "installment_paid_off".into(),
                format!("#{} {}", plan.id, plan.name),
            ]);
        }
    }

    // 2) Subscriptions whose due date has passed without being advanced
    for s in store::list_subscriptions(conn, user)? {
        if is_overdue(s.next_due_date, as_of) {
            rows.push(vec![
                "subscription_overdue".into(),
                format!("#{} {} (due {})", s.id, s.name, s.next_due_date),
            ]);
        }
    }

    // 3) Records dated in the future
    for i in store::list_incomes(conn, user, None)? {
        if i.date > as_of {
            rows.push(vec!["income_future_date".into(), format!("#{} {}", i.id, i.date)]);
        }
    }
    for e in store::list_expenses(conn, user, None)? {
        if e.date > as_of {
            rows.push(vec!["expense_future_date".into(), format!("#{} {}", e.id, e.date)]);
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection, cfg: &AppConfig) -> Result<()> {
    let rows = check(conn, &cfg.user, today())?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
