// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Kind;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Rejections raised before any store is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("rate must not be negative (got {0})")]
    NegativeRate(Decimal),
    #[error("category must not be empty")]
    EmptyCategory,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend unreachable, rejected the request, or returned something unusable.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The version token was stale: someone else wrote first.
    #[error("the ledger changed while saving; please retry")]
    WriteConflict,

    #[error("a {kind} of {amount} for '{category}' was just recorded; skipped as a likely duplicate")]
    DuplicateSuspected {
        kind: Kind,
        category: String,
        amount: Decimal,
    },

    #[error("this store needs a signed-in identity")]
    MissingOwner,

    #[error("malformed record at row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}
