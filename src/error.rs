// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Domain errors surfaced to the command layer. All of them are recoverable:
/// none leaves stored records half-updated.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FinanceError {
    #[error("installment plan '{name}' is already fully paid")]
    AlreadyComplete { name: String },
    #[error("not enough data: record some income or expenses for the period first")]
    InsufficientData,
    #[error("budget recommendation unavailable: {0}")]
    RecommendationUnavailable(String),
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("{kind} #{id} was changed concurrently; reload and try again")]
    Conflict { kind: &'static str, id: i64 },
}

impl FinanceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        FinanceError::Validation {
            field,
            message: message.into(),
        }
    }
}
