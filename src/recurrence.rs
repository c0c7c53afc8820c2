// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Due-date arithmetic for installment plans and subscriptions.
//!
//! Every date advance goes through [`add_months_clamped`]: the day of month is
//! kept when it exists in the target month and clamped to the month's last day
//! otherwise (Jan 31 + 1 month = Feb 28/29). Installment dates are always
//! computed from the plan's start date, so a clamp in February does not leak
//! into later months. Subscriptions advance from their current due date one
//! cycle at a time.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::error::FinanceError;
use crate::models::{InstallmentPlan, Recurrence};

/// Calendar-month addition with end-of-month clamping. Saturates at
/// `NaiveDate::MAX` instead of failing.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Due date of the next unpaid installment: `start_date + paid` months.
pub fn next_installment_date(start_date: NaiveDate, paid_installments: u32) -> NaiveDate {
    add_months_clamped(start_date, paid_installments)
}

pub fn is_installment_plan_complete(paid_installments: u32, installments_count: u32) -> bool {
    paid_installments >= installments_count
}

/// Marks one more installment as paid. The returned plan differs from the
/// input only in `paid_installments`.
pub fn advance_installment(plan: &InstallmentPlan) -> Result<InstallmentPlan, FinanceError> {
    if is_installment_plan_complete(plan.paid_installments, plan.installments_count) {
        return Err(FinanceError::AlreadyComplete {
            name: plan.name.clone(),
        });
    }
    Ok(InstallmentPlan {
        paid_installments: plan.paid_installments + 1,
        ..plan.clone()
    })
}

/// Fraction of the plan already paid, in `[0, 1]`.
pub fn progress_ratio(paid_installments: u32, installments_count: u32) -> Decimal {
    if installments_count == 0 {
        return Decimal::ONE;
    }
    let ratio = Decimal::from(paid_installments) / Decimal::from(installments_count);
    ratio.min(Decimal::ONE)
}

pub fn monthly_payment(plan: &InstallmentPlan) -> Decimal {
    if plan.installments_count == 0 {
        return plan.total_amount;
    }
    plan.total_amount / Decimal::from(plan.installments_count)
}

/// Amount still owed on the plan.
pub fn remaining_balance(plan: &InstallmentPlan) -> Decimal {
    let left = plan
        .installments_count
        .saturating_sub(plan.paid_installments);
    monthly_payment(plan) * Decimal::from(left)
}

/// Due dates of every unpaid installment, earliest first.
pub fn remaining_installment_dates(plan: &InstallmentPlan) -> Vec<NaiveDate> {
    (plan.paid_installments..plan.installments_count)
        .map(|cycle| next_installment_date(plan.start_date, cycle))
        .collect()
}

pub fn next_subscription_due_date(current_due_date: NaiveDate, recurrence: Recurrence) -> NaiveDate {
    match recurrence {
        Recurrence::Monthly => add_months_clamped(current_due_date, 1),
        Recurrence::Annual => add_months_clamped(current_due_date, 12),
    }
}

pub fn is_overdue(due_date: NaiveDate, as_of: NaiveDate) -> bool {
    due_date < as_of
}
