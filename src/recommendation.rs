// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget advice from an external text-generation service.
//!
//! The request carries the period's total income and per-category expense
//! totals; the response text is returned verbatim. One request per call, no
//! retries: every failure collapses into
//! [`FinanceError::RecommendationUnavailable`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;
use crate::error::FinanceError;
use crate::utils::http_client;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Wire shape: `{ "totalIncome": number, "expenses": [{ "category", "amount" }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    pub expenses: Vec<ExpenseLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationResponse {
    recommendation_text: String,
}

pub trait BudgetAdvisor {
    fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<String, FinanceError>;
}

pub fn build_recommendation_request(
    total_income: Decimal,
    expenses_by_category: Vec<(String, Decimal)>,
) -> Result<RecommendationRequest, FinanceError> {
    if total_income < Decimal::ZERO {
        return Err(FinanceError::validation(
            "total_income",
            "must not be negative",
        ));
    }
    if total_income.is_zero() && expenses_by_category.is_empty() {
        return Err(FinanceError::InsufficientData);
    }
    let mut expenses = Vec::with_capacity(expenses_by_category.len());
    for (category, amount) in expenses_by_category {
        if amount <= Decimal::ZERO {
            return Err(FinanceError::validation(
                "amount",
                format!("expense total for '{}' must be positive", category),
            ));
        }
        expenses.push(ExpenseLine { category, amount });
    }
    Ok(RecommendationRequest {
        total_income,
        expenses,
    })
}

pub fn request_budget_recommendation(
    advisor: &dyn BudgetAdvisor,
    request: &RecommendationRequest,
) -> Result<String, FinanceError> {
    tracing::info!(
        income = %request.total_income,
        categories = request.expenses.len(),
        "requesting budget recommendation"
    );
    match advisor.generate_recommendations(request) {
        Ok(text) => Ok(text),
        Err(FinanceError::RecommendationUnavailable(reason)) => {
            tracing::warn!(%reason, "budget recommendation failed");
            Err(FinanceError::RecommendationUnavailable(reason))
        }
        Err(other) => {
            tracing::warn!(error = %other, "budget recommendation failed");
            Err(FinanceError::RecommendationUnavailable(other.to_string()))
        }
    }
}

/// Posts the request as JSON to a configured endpoint.
pub struct HttpAdvisor {
    client: reqwest::blocking::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpAdvisor {
    pub fn from_config(cfg: &AdvisorConfig) -> Result<Self, FinanceError> {
        let url = cfg.url.clone().ok_or_else(|| {
            FinanceError::RecommendationUnavailable(
                "no advisor endpoint configured (set advisor_url or MONEYTRAIL_ADVISOR_URL)"
                    .to_string(),
            )
        })?;
        let client = http_client(cfg.timeout)
            .map_err(|e| FinanceError::RecommendationUnavailable(e.to_string()))?;
        Ok(HttpAdvisor {
            client,
            url,
            api_key: cfg.api_key.clone(),
        })
    }
}

impl BudgetAdvisor for HttpAdvisor {
    fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<String, FinanceError> {
        let unavailable = |e: reqwest::Error| {
            let reason = if e.is_timeout() {
                "advisor request timed out".to_string()
            } else {
                e.to_string()
            };
            FinanceError::RecommendationUnavailable(reason)
        };
        let mut req = self.client.post(&self.url).json(request);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        let body: RecommendationResponse = resp.json().map_err(unavailable)?;
        tracing::debug!(chars = body.recommendation_text.len(), "advisor responded");
        Ok(body.recommendation_text)
    }
}
