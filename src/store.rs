// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed access to the record tables. Every query is filtered by `user_id`;
//! a record owned by another user behaves exactly like a missing one.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::FinanceError;
use crate::models::{ExpenseRecord, IncomeRecord, InstallmentPlan, Recurrence, Subscription};
use crate::utils::month_key;

fn dec(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", what, s))
}

fn date(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} '{}' in database", what, s))
}

fn month_clause(month: Option<(i32, u32)>) -> (String, Option<String>) {
    match month {
        Some((y, m)) => (
            " AND substr(date,1,7)=?2".to_string(),
            Some(month_key(y, m)),
        ),
        None => (String::new(), None),
    }
}

fn query_all<T>(
    conn: &Connection,
    sql: &str,
    user: &str,
    month: Option<String>,
    map: impl Fn(&Row<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = match month {
        Some(ref m) => stmt.query(params![user, m])?,
        None => stmt.query(params![user])?,
    };
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(map(r)?);
    }
    Ok(out)
}

fn ensure_changed(changed: usize, kind: &'static str, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(FinanceError::NotFound { kind, id }.into());
    }
    Ok(())
}

// ---- incomes

fn income_from_row(r: &Row<'_>) -> Result<IncomeRecord> {
    let amount: String = r.get(2)?;
    let d: String = r.get(3)?;
    Ok(IncomeRecord {
        id: r.get(0)?,
        source: r.get(1)?,
        amount: dec(&amount, "income amount")?,
        date: date(&d, "income date")?,
    })
}

pub fn insert_income(conn: &Connection, user: &str, rec: &IncomeRecord) -> Result<i64> {
    rec.validate()?;
    conn.execute(
        "INSERT INTO incomes(user_id, source, amount, date) VALUES (?1, ?2, ?3, ?4)",
        params![user, rec.source.trim(), rec.amount.to_string(), rec.date.to_string()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, id, amount = %rec.amount, "income recorded");
    Ok(id)
}

pub fn list_incomes(
    conn: &Connection,
    user: &str,
    month: Option<(i32, u32)>,
) -> Result<Vec<IncomeRecord>> {
    let (clause, m) = month_clause(month);
    let sql = format!(
        "SELECT id, source, amount, date FROM incomes WHERE user_id=?1{} ORDER BY date DESC, id DESC",
        clause
    );
    query_all(conn, &sql, user, m, income_from_row)
}

pub fn get_income(conn: &Connection, user: &str, id: i64) -> Result<IncomeRecord> {
    let mut stmt =
        conn.prepare("SELECT id, source, amount, date FROM incomes WHERE id=?1 AND user_id=?2")?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => income_from_row(r),
        None => Err(FinanceError::NotFound { kind: "income", id }.into()),
    }
}

pub fn update_income(conn: &Connection, user: &str, rec: &IncomeRecord) -> Result<()> {
    rec.validate()?;
    let changed = conn.execute(
        "UPDATE incomes SET source=?1, amount=?2, date=?3 WHERE id=?4 AND user_id=?5",
        params![rec.source.trim(), rec.amount.to_string(), rec.date.to_string(), rec.id, user],
    )?;
    ensure_changed(changed, "income", rec.id)
}

pub fn delete_income(conn: &Connection, user: &str, id: i64) -> Result<()> {
    let changed = conn.execute(
        "DELETE FROM incomes WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    ensure_changed(changed, "income", id)
}

// ---- expenses

fn expense_from_row(r: &Row<'_>) -> Result<ExpenseRecord> {
    let amount: String = r.get(3)?;
    let d: String = r.get(4)?;
    Ok(ExpenseRecord {
        id: r.get(0)?,
        category: r.get(1)?,
        item: r.get(2)?,
        amount: dec(&amount, "expense amount")?,
        date: date(&d, "expense date")?,
    })
}

pub fn insert_expense(conn: &Connection, user: &str, rec: &ExpenseRecord) -> Result<i64> {
    rec.validate()?;
    conn.execute(
        "INSERT INTO expenses(user_id, category, item, amount, date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user,
            rec.category.trim(),
            rec.item.trim(),
            rec.amount.to_string(),
            rec.date.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, id, category = %rec.category, amount = %rec.amount, "expense recorded");
    Ok(id)
}

pub fn list_expenses(
    conn: &Connection,
    user: &str,
    month: Option<(i32, u32)>,
) -> Result<Vec<ExpenseRecord>> {
    let (clause, m) = month_clause(month);
    let sql = format!(
        "SELECT id, category, item, amount, date FROM expenses WHERE user_id=?1{} ORDER BY date DESC, id DESC",
        clause
    );
    query_all(conn, &sql, user, m, expense_from_row)
}

pub fn get_expense(conn: &Connection, user: &str, id: i64) -> Result<ExpenseRecord> {
    let mut stmt = conn.prepare(
        "SELECT id, category, item, amount, date FROM expenses WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => expense_from_row(r),
        None => Err(FinanceError::NotFound { kind: "expense", id }.into()),
    }
}

pub fn update_expense(conn: &Connection, user: &str, rec: &ExpenseRecord) -> Result<()> {
    rec.validate()?;
    let changed = conn.execute(
        "UPDATE expenses SET category=?1, item=?2, amount=?3, date=?4 WHERE id=?5 AND user_id=?6",
        params![
            rec.category.trim(),
            rec.item.trim(),
            rec.amount.to_string(),
            rec.date.to_string(),
            rec.id,
            user
        ],
    )?;
    ensure_changed(changed, "expense", rec.id)
}

pub fn delete_expense(conn: &Connection, user: &str, id: i64) -> Result<()> {
    let changed = conn.execute(
        "DELETE FROM expenses WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    ensure_changed(changed, "expense", id)
}

// ---- installments

fn installment_from_row(r: &Row<'_>) -> Result<InstallmentPlan> {
    let total: String = r.get(2)?;
    let start: String = r.get(5)?;
    Ok(InstallmentPlan {
        id: r.get(0)?,
        name: r.get(1)?,
        total_amount: dec(&total, "installment total")?,
        installments_count: r.get(3)?,
        paid_installments: r.get(4)?,
        start_date: date(&start, "installment start date")?,
        category: r.get(6)?,
    })
}

const INSTALLMENT_COLS: &str =
    "id, name, total_amount, installments_count, paid_installments, start_date, category";

pub fn insert_installment(conn: &Connection, user: &str, plan: &InstallmentPlan) -> Result<i64> {
    plan.validate()?;
    conn.execute(
        "INSERT INTO installments(user_id, name, total_amount, installments_count, paid_installments, start_date, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            plan.name.trim(),
            plan.total_amount.to_string(),
            plan.installments_count,
            plan.paid_installments,
            plan.start_date.to_string(),
            plan.category.trim()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, id, name = %plan.name, count = plan.installments_count, "installment plan created");
    Ok(id)
}

pub fn list_installments(conn: &Connection, user: &str) -> Result<Vec<InstallmentPlan>> {
    let sql = format!(
        "SELECT {} FROM installments WHERE user_id=?1 ORDER BY start_date, id",
        INSTALLMENT_COLS
    );
    query_all(conn, &sql, user, None, installment_from_row)
}

pub fn get_installment(conn: &Connection, user: &str, id: i64) -> Result<InstallmentPlan> {
    let sql = format!(
        "SELECT {} FROM installments WHERE id=?1 AND user_id=?2",
        INSTALLMENT_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => installment_from_row(r),
        None => Err(FinanceError::NotFound {
            kind: "installment",
            id,
        }
        .into()),
    }
}

/// Rewrites a plan, guarded by the same compare-and-swap as
/// [`set_paid_installments`]: only applies while the stored paid counter
/// still equals `expected_paid`.
pub fn update_installment(
    conn: &Connection,
    user: &str,
    plan: &InstallmentPlan,
    expected_paid: u32,
) -> Result<()> {
    plan.validate()?;
    let changed = conn.execute(
        "UPDATE installments SET name=?1, total_amount=?2, installments_count=?3, paid_installments=?4, start_date=?5, category=?6
         WHERE id=?7 AND user_id=?8 AND paid_installments=?9",
        params![
            plan.name.trim(),
            plan.total_amount.to_string(),
            plan.installments_count,
            plan.paid_installments,
            plan.start_date.to_string(),
            plan.category.trim(),
            plan.id,
            user,
            expected_paid
        ],
    )?;
    if changed == 0 {
        return Err(installment_miss(conn, user, plan.id, expected_paid)?);
    }
    Ok(())
}

/// Tells a lost race on the paid counter apart from a missing plan.
fn installment_miss(conn: &Connection, user: &str, id: i64, expected: u32) -> Result<anyhow::Error> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM installments WHERE id=?1 AND user_id=?2",
            params![id, user],
            |r| r.get(0),
        )
        .optional()?;
    Ok(match exists {
        Some(_) => {
            tracing::warn!(user, id, expected, "stale paid_installments update rejected");
            FinanceError::Conflict {
                kind: "installment",
                id,
            }
            .into()
        }
        None => FinanceError::NotFound {
            kind: "installment",
            id,
        }
        .into(),
    })
}

/// Compare-and-swap on the paid counter: only applies when the stored value
/// still equals `expected`.
pub fn set_paid_installments(
    conn: &Connection,
    user: &str,
    id: i64,
    expected: u32,
    new_value: u32,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE installments SET paid_installments=?1
         WHERE id=?2 AND user_id=?3 AND paid_installments=?4",
        params![new_value, id, user, expected],
    )?;
    if changed == 0 {
        return Err(installment_miss(conn, user, id, expected)?);
    }
    Ok(())
}

pub fn delete_installment(conn: &Connection, user: &str, id: i64) -> Result<()> {
    let changed = conn.execute(
        "DELETE FROM installments WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    ensure_changed(changed, "installment", id)
}

// ---- subscriptions

fn subscription_from_row(r: &Row<'_>) -> Result<Subscription> {
    let amount: String = r.get(2)?;
    let recurrence: String = r.get(3)?;
    let due: String = r.get(4)?;
    Ok(Subscription {
        id: r.get(0)?,
        name: r.get(1)?,
        amount: dec(&amount, "subscription amount")?,
        recurrence: recurrence.parse::<Recurrence>()?,
        next_due_date: date(&due, "subscription due date")?,
        category: r.get(5)?,
    })
}

const SUBSCRIPTION_COLS: &str = "id, name, amount, recurrence, next_due_date, category";

pub fn insert_subscription(conn: &Connection, user: &str, sub: &Subscription) -> Result<i64> {
    sub.validate()?;
    conn.execute(
        "INSERT INTO subscriptions(user_id, name, amount, recurrence, next_due_date, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            sub.name.trim(),
            sub.amount.to_string(),
            sub.recurrence.as_str(),
            sub.next_due_date.to_string(),
            sub.category.trim()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, id, name = %sub.name, recurrence = %sub.recurrence, "subscription created");
    Ok(id)
}

pub fn list_subscriptions(conn: &Connection, user: &str) -> Result<Vec<Subscription>> {
    let sql = format!(
        "SELECT {} FROM subscriptions WHERE user_id=?1 ORDER BY next_due_date, id",
        SUBSCRIPTION_COLS
    );
    query_all(conn, &sql, user, None, subscription_from_row)
}

pub fn get_subscription(conn: &Connection, user: &str, id: i64) -> Result<Subscription> {
    let sql = format!(
        "SELECT {} FROM subscriptions WHERE id=?1 AND user_id=?2",
        SUBSCRIPTION_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => subscription_from_row(r),
        None => Err(FinanceError::NotFound {
            kind: "subscription",
            id,
        }
        .into()),
    }
}

pub fn update_subscription(conn: &Connection, user: &str, sub: &Subscription) -> Result<()> {
    sub.validate()?;
    let changed = conn.execute(
        "UPDATE subscriptions SET name=?1, amount=?2, recurrence=?3, next_due_date=?4, category=?5
         WHERE id=?6 AND user_id=?7",
        params![
            sub.name.trim(),
            sub.amount.to_string(),
            sub.recurrence.as_str(),
            sub.next_due_date.to_string(),
            sub.category.trim(),
            sub.id,
            user
        ],
    )?;
    ensure_changed(changed, "subscription", sub.id)
}

/// Compare-and-swap on the due date, mirroring [`set_paid_installments`].
pub fn set_next_due_date(
    conn: &Connection,
    user: &str,
    id: i64,
    expected: NaiveDate,
    new_value: NaiveDate,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE subscriptions SET next_due_date=?1
         WHERE id=?2 AND user_id=?3 AND next_due_date=?4",
        params![new_value.to_string(), id, user, expected.to_string()],
    )?;
    if changed == 0 {
        // distinguishes a missing row from a lost race
        get_subscription(conn, user, id)?;
        tracing::warn!(user, id, %expected, "stale next_due_date update rejected");
        return Err(FinanceError::Conflict {
            kind: "subscription",
            id,
        }
        .into());
    }
    Ok(())
}

pub fn delete_subscription(conn: &Connection, user: &str, id: i64) -> Result<()> {
    let changed = conn.execute(
        "DELETE FROM subscriptions WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    ensure_changed(changed, "subscription", id)
}
