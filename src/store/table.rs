// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};
use crate::models::{Owner, Record, Snapshot, VersionToken};
use crate::schema::TableRow;

use super::{DuplicateProbe, LedgerStore};

/// Equality/range filter understood by every [`TableService`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    pub user_id: Option<String>,
    pub tipo: Option<String>,
    pub categoria: Option<String>,
    pub monto: Option<Decimal>,
    /// Inclusive lower bound on `fecha`.
    pub fecha_gte: Option<NaiveDateTime>,
    /// Newest first instead of insertion order.
    pub newest_first: bool,
}

impl TableFilter {
    pub fn owned_by(owner: &Owner) -> Self {
        Self {
            user_id: Some(owner.as_str().to_string()),
            ..Self::default()
        }
    }
}

/// Hosted table with row-level ownership.
pub trait TableService {
    fn select(&self, table: &str, filter: &TableFilter) -> Result<Vec<TableRow>>;
    fn insert(&self, table: &str, row: &TableRow) -> Result<TableRow>;
}

/// Multi-tenant store: one row per record, every call scoped to the owner.
pub struct HostedTableStore<T> {
    service: T,
    table: String,
}

impl<T: TableService> HostedTableStore<T> {
    pub fn new(service: T, table: impl Into<String>) -> Self {
        Self {
            service,
            table: table.into(),
        }
    }

    fn rows_to_records(&self, rows: Vec<TableRow>, owner: &Owner) -> Result<Vec<Record>> {
        let mut out = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            // Rows of other identities are never surfaced, whatever the service returns.
            if row.user_id != owner.as_str() {
                warn!(table = %self.table, "dropping row owned by another identity");
                continue;
            }
            out.push(row.into_record(i + 1)?);
        }
        Ok(out)
    }
}

impl<T: TableService> LedgerStore for HostedTableStore<T> {
    fn describe(&self) -> String {
        format!("table {}", self.table)
    }

    fn load_all(&self, owner: Option<&Owner>) -> Result<Snapshot> {
        let Some(owner) = owner else {
            debug!(table = %self.table, "no identity; nothing is visible");
            return Ok(Snapshot::empty());
        };
        let rows = self.service.select(&self.table, &TableFilter::owned_by(owner))?;
        Ok(Snapshot {
            records: self.rows_to_records(rows, owner)?,
            version: None,
        })
    }

    fn append(
        &self,
        record: &Record,
        owner: Option<&Owner>,
        _version: Option<&VersionToken>,
    ) -> Result<()> {
        let owner = owner.ok_or(LedgerError::MissingOwner)?;
        let row = TableRow::from_record(record, owner);
        self.service.insert(&self.table, &row)?;
        info!(table = %self.table, kind = %record.kind, category = %record.category, "row inserted");
        Ok(())
    }

    fn recent_matches(&self, owner: Option<&Owner>, probe: &DuplicateProbe) -> Result<Vec<Record>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        let filter = TableFilter {
            user_id: Some(owner.as_str().to_string()),
            tipo: Some(probe.kind.label().to_string()),
            categoria: Some(probe.category.clone()),
            monto: Some(probe.amount),
            fecha_gte: Some(probe.since),
            newest_first: true,
        };
        let rows = self.service.select(&self.table, &filter)?;
        Ok(self
            .rows_to_records(rows, owner)?
            .into_iter()
            .filter(|r| probe.matches(r))
            .collect())
    }
}
