// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub category: String,
    pub item: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: i64,
    pub name: String,
    pub total_amount: Decimal,
    pub installments_count: u32,
    pub paid_installments: u32,
    pub start_date: NaiveDate,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub recurrence: Recurrence,
    pub next_due_date: NaiveDate,
    pub category: String,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Monthly => "monthly",
            Recurrence::Annual => "annual",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Recurrence::Monthly),
            "annual" | "yearly" | "year" | "y" => Ok(Recurrence::Annual),
            other => Err(FinanceError::validation(
                "recurrence",
                format!("unknown recurrence '{}', expected monthly|annual", other),
            )),
        }
    }
}

/// Anything carrying a positive amount on a calendar date.
pub trait Monetary {
    fn amount(&self) -> Decimal;
    fn date(&self) -> NaiveDate;
}

impl Monetary for IncomeRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Monetary for ExpenseRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
}

fn positive(field: &'static str, amount: Decimal) -> Result<(), FinanceError> {
    if amount <= Decimal::ZERO {
        return Err(FinanceError::validation(field, "amount must be positive"));
    }
    Ok(())
}

fn min_len(field: &'static str, value: &str, min: usize) -> Result<(), FinanceError> {
    if value.trim().chars().count() < min {
        let message = if min == 1 {
            "must not be empty".to_string()
        } else {
            format!("must be at least {} characters", min)
        };
        return Err(FinanceError::validation(field, message));
    }
    Ok(())
}

impl IncomeRecord {
    pub fn validate(&self) -> Result<(), FinanceError> {
        min_len("source", &self.source, 2)?;
        positive("amount", self.amount)
    }
}

impl ExpenseRecord {
    pub fn validate(&self) -> Result<(), FinanceError> {
        min_len("category", &self.category, 1)?;
        min_len("item", &self.item, 1)?;
        positive("amount", self.amount)
    }
}

impl InstallmentPlan {
    pub fn validate(&self) -> Result<(), FinanceError> {
        min_len("name", &self.name, 2)?;
        min_len("category", &self.category, 1)?;
        positive("total_amount", self.total_amount)?;
        if self.installments_count < 2 {
            return Err(FinanceError::validation(
                "installments_count",
                "must be at least 2 installments",
            ));
        }
        if self.paid_installments > self.installments_count {
            return Err(FinanceError::validation(
                "paid_installments",
                format!(
                    "cannot exceed installments_count ({})",
                    self.installments_count
                ),
            ));
        }
        Ok(())
    }
}

impl Subscription {
    pub fn validate(&self) -> Result<(), FinanceError> {
        min_len("name", &self.name, 2)?;
        min_len("category", &self.category, 1)?;
        positive("amount", self.amount)
    }
}
