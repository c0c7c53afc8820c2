// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregation::{group_by_category, sum_amounts};
use crate::config::{AdvisorConfig, AppConfig};
use crate::recommendation::{
    BudgetAdvisor, HttpAdvisor, RecommendationRequest, build_recommendation_request,
    request_budget_recommendation,
};
use crate::store;
use crate::utils::{month_key, month_opt, today};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("recommend", sub)) => {
            let month = month_opt(sub)?.unwrap_or_else(|| {
                let t = today();
                (t.year(), t.month())
            });
            let advisor_cfg = AdvisorConfig::load(conn)?;
            let text = recommend_with_config(conn, &cfg.user, month, &advisor_cfg)?;
            println!("Budget recommendations for {}:\n", month_key(month.0, month.1));
            println!("{}", text);
        }
        _ => {}
    }
    Ok(())
}

/// The month's total income and per-category spending, checked for enough data.
pub fn month_request(
    conn: &Connection,
    user: &str,
    month: (i32, u32),
) -> Result<RecommendationRequest> {
    let incomes = store::list_incomes(conn, user, Some(month))?;
    let expenses = store::list_expenses(conn, user, Some(month))?;
    let total_income = sum_amounts(&incomes);
    let by_category: Vec<_> = group_by_category(&expenses).into_iter().collect();
    Ok(build_recommendation_request(total_income, by_category)?)
}

/// Like [`recommend`], but only builds the HTTP advisor once the month has data.
pub fn recommend_with_config(
    conn: &Connection,
    user: &str,
    month: (i32, u32),
    advisor_cfg: &AdvisorConfig,
) -> Result<String> {
    let request = month_request(conn, user, month)?;
    let advisor = HttpAdvisor::from_config(advisor_cfg)?;
    Ok(request_budget_recommendation(&advisor, &request)?)
}

/// Builds the month's income/expense snapshot and asks `advisor` once.
pub fn recommend(
    conn: &Connection,
    user: &str,
    month: (i32, u32),
    advisor: &dyn BudgetAdvisor,
) -> Result<String> {
    let request = month_request(conn, user, month)?;
    Ok(request_budget_recommendation(advisor, &request)?)
}
