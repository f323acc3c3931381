// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, ValidationError};

/// What a record does to the money on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "Ingreso")]
    Income,
    #[serde(rename = "Gasto")]
    Expense,
    #[serde(rename = "Ahorro")]
    Saving,
    #[serde(rename = "Inversion")]
    Investment,
}

impl Kind {
    /// Label persisted in the `Tipo` column.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Income => "Ingreso",
            Kind::Expense => "Gasto",
            Kind::Saving => "Ahorro",
            Kind::Investment => "Inversion",
        }
    }

    /// Savings and investments are both set aside from the available balance.
    pub fn is_set_aside(self) -> bool {
        matches!(self, Kind::Saving | Kind::Investment)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingreso" | "income" => Ok(Kind::Income),
            "gasto" | "expense" => Ok(Kind::Expense),
            "ahorro" | "saving" | "savings" => Ok(Kind::Saving),
            "inversion" | "inversión" | "investment" => Ok(Kind::Investment),
            other => Err(format!("unknown record kind '{}'", other)),
        }
    }
}

/// Identity that scopes records under multi-tenant stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque revision marker of a versioned store's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One financial movement as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub note: Option<String>,
    pub owner: Option<Owner>,
}

impl Record {
    /// Amount expressed in the secondary currency. Display only, never stored;
    /// saturates rather than overflowing.
    pub fn secondary_amount(&self) -> Decimal {
        self.amount.saturating_mul(self.rate)
    }

    pub fn with_owner(mut self, owner: Option<&Owner>) -> Self {
        self.owner = owner.cloned();
        self
    }
}

/// Form input before it becomes a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub note: Option<String>,
}

impl RecordDraft {
    pub fn new(kind: Kind, category: impl Into<String>, amount: Decimal, rate: Decimal) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            rate,
            note: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.rate < Decimal::ZERO {
            return Err(ValidationError::NegativeRate(self.rate));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// Validates the draft and stamps it with `now`, truncated to whole
    /// seconds so the persisted timestamp reads back identical.
    pub fn into_record(
        self,
        now: NaiveDateTime,
        owner: Option<&Owner>,
    ) -> Result<Record, LedgerError> {
        self.validate()?;
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(Record {
            timestamp,
            kind: self.kind,
            category: self.category.trim().to_string(),
            amount: self.amount,
            rate: self.rate,
            note,
            owner: owner.cloned(),
        })
    }
}

/// Result of reading a whole store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<Record>,
    pub version: Option<VersionToken>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}
