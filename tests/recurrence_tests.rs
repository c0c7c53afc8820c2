// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneytrail::error::FinanceError;
use moneytrail::models::{InstallmentPlan, Recurrence};
use moneytrail::recurrence::*;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn laptop() -> InstallmentPlan {
    InstallmentPlan {
        id: 1,
        name: "Laptop".into(),
        total_amount: Decimal::from(1200),
        installments_count: 12,
        paid_installments: 0,
        start_date: d(2024, 1, 15),
        category: "Electronics".into(),
    }
}

#[test]
fn fresh_plan_starts_at_start_date() {
    let plan = laptop();
    assert_eq!(monthly_payment(&plan), Decimal::from(100));
    assert_eq!(
        next_installment_date(plan.start_date, plan.paid_installments),
        d(2024, 1, 15)
    );
    assert_eq!(
        progress_ratio(plan.paid_installments, plan.installments_count),
        Decimal::ZERO
    );
    assert_eq!(remaining_balance(&plan), Decimal::from(1200));
}

#[test]
fn twelve_payments_complete_the_plan() {
    let mut plan = laptop();
    for _ in 0..12 {
        plan = advance_installment(&plan).unwrap();
    }
    assert_eq!(plan.paid_installments, 12);
    assert!(is_installment_plan_complete(
        plan.paid_installments,
        plan.installments_count
    ));
    assert_eq!(progress_ratio(12, 12), Decimal::ONE);
    assert_eq!(remaining_balance(&plan), Decimal::ZERO);
    assert!(remaining_installment_dates(&plan).is_empty());

    let err = advance_installment(&plan).unwrap_err();
    assert_eq!(
        err,
        FinanceError::AlreadyComplete {
            name: "Laptop".into()
        }
    );
}

#[test]
fn advance_only_touches_the_counter() {
    let plan = laptop();
    let next = advance_installment(&plan).unwrap();
    assert_eq!(next.paid_installments, 1);
    assert_eq!(
        InstallmentPlan {
            paid_installments: 0,
            ..next
        },
        plan
    );
}

#[test]
fn completion_only_at_count() {
    let count = 6;
    for paid in 0..count {
        assert!(!is_installment_plan_complete(paid, count), "paid={}", paid);
    }
    assert!(is_installment_plan_complete(count, count));
    assert!(is_installment_plan_complete(count + 1, count));
}

#[test]
fn progress_is_a_fraction() {
    assert_eq!(progress_ratio(6, 12), Decimal::new(5, 1));
    assert_eq!(progress_ratio(3, 4), Decimal::new(75, 2));
    assert_eq!(progress_ratio(20, 4), Decimal::ONE);
    assert_eq!(progress_ratio(0, 0), Decimal::ONE);
}

#[test]
fn stepwise_installment_dates_compose() {
    // clamping makes the composition exact only for days that exist in every month
    for start in [d(2023, 1, 1), d(2024, 1, 15), d(2024, 11, 28)] {
        for n in 0..40u32 {
            let direct = next_installment_date(start, n + 1);
            let stepped = next_installment_date(next_installment_date(start, n), 1);
            assert_eq!(direct, stepped, "start={} n={}", start, n);
        }
    }
}

#[test]
fn installment_dates_are_anchored_to_start() {
    let start = d(2024, 1, 31);
    assert_eq!(next_installment_date(start, 1), d(2024, 2, 29));
    assert_eq!(next_installment_date(start, 2), d(2024, 3, 31));
    assert_eq!(next_installment_date(start, 13), d(2025, 2, 28));
}

#[test]
fn remaining_dates_skip_paid_cycles() {
    let mut plan = laptop();
    plan.installments_count = 4;
    plan.paid_installments = 2;
    assert_eq!(
        remaining_installment_dates(&plan),
        vec![d(2024, 3, 15), d(2024, 4, 15)]
    );
}

#[test]
fn monthly_subscription_clamps_to_leap_day() {
    assert_eq!(
        next_subscription_due_date(d(2024, 1, 31), Recurrence::Monthly),
        d(2024, 2, 29)
    );
    assert_eq!(
        next_subscription_due_date(d(2023, 1, 31), Recurrence::Monthly),
        d(2023, 2, 28)
    );
    assert_eq!(
        next_subscription_due_date(d(2024, 12, 10), Recurrence::Monthly),
        d(2025, 1, 10)
    );
}

#[test]
fn annual_subscription_moves_one_year() {
    assert_eq!(
        next_subscription_due_date(d(2024, 6, 1), Recurrence::Annual),
        d(2025, 6, 1)
    );
    assert_eq!(
        next_subscription_due_date(d(2024, 2, 29), Recurrence::Annual),
        d(2025, 2, 28)
    );
}

#[test]
fn subscription_due_date_never_decreases() {
    let mut due = d(2024, 1, 31);
    for _ in 0..30 {
        let next = next_subscription_due_date(due, Recurrence::Monthly);
        assert!(next > due);
        due = next;
    }
}

#[test]
fn overdue_is_strictly_before() {
    let today = d(2024, 5, 10);
    assert!(is_overdue(d(2024, 5, 9), today));
    assert!(!is_overdue(d(2024, 5, 10), today));
    assert!(!is_overdue(d(2024, 5, 11), today));
}

#[test]
fn month_addition_saturates() {
    assert_eq!(add_months_clamped(NaiveDate::MAX, 1), NaiveDate::MAX);
}
