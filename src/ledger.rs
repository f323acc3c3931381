// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One submission or one page view, start to finish.

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::guard::{DuplicateGuard, Verdict};
use crate::models::{Owner, Record, RecordDraft, VersionToken};
use crate::store::LedgerStore;
use crate::summary::{Summary, summarize};

/// What a caller renders: the records, their totals, and the token to hand
/// back on the next submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub records: Vec<Record>,
    pub summary: Summary,
    pub version: Option<VersionToken>,
    /// Set when the store could not be read and the view is empty because of it.
    pub warning: Option<String>,
}

pub struct Ledger<S> {
    store: S,
    guard: DuplicateGuard,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: S, guard: DuplicateGuard) -> Self {
        Self { store, guard }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read everything visible to `owner`. Never fails: an unreadable store is
    /// an empty view with a warning attached.
    pub fn overview(&self, owner: Option<&Owner>) -> Overview {
        match self.store.load_all(owner) {
            Ok(snap) => Overview {
                summary: summarize(&snap.records),
                records: snap.records,
                version: snap.version,
                warning: None,
            },
            Err(e) => {
                warn!(store = %self.store.describe(), error = %e, "load failed; showing empty ledger");
                Overview {
                    warning: Some(e.to_string()),
                    ..Overview::default()
                }
            }
        }
    }

    pub fn submit(
        &self,
        owner: Option<&Owner>,
        draft: RecordDraft,
        version: Option<&VersionToken>,
    ) -> Result<Record> {
        self.submit_at(owner, draft, version, Local::now().naive_local())
    }

    /// Validate, check for a double submission, then append. A write conflict
    /// is retried once with a freshly loaded token before it is surfaced.
    pub fn submit_at(
        &self,
        owner: Option<&Owner>,
        draft: RecordDraft,
        version: Option<&VersionToken>,
        now: NaiveDateTime,
    ) -> Result<Record> {
        let record = draft.into_record(now, owner)?;

        // The window ends at the stamp that would be persisted, not at `now`.
        if let Verdict::Duplicate(prev) =
            self.guard.check(&self.store, owner, &record, record.timestamp)
        {
            info!(previous = %prev.timestamp, category = %record.category, "submission skipped as duplicate");
            return Err(LedgerError::DuplicateSuspected {
                kind: record.kind,
                category: record.category,
                amount: record.amount,
            });
        }

        match self.store.append(&record, owner, version) {
            Ok(()) => {}
            Err(LedgerError::WriteConflict) => {
                warn!(store = %self.store.describe(), "write conflict; retrying once with a fresh token");
                let fresh = self.store.load_all(owner)?.version;
                self.store.append(&record, owner, fresh.as_ref())?;
            }
            Err(e) => return Err(e),
        }
        info!(kind = %record.kind, category = %record.category, amount = %record.amount, "record appended");
        Ok(record)
    }

    /// Append records that already carry their timestamps (imports and
    /// migrations). Skips the duplicate guard.
    pub fn import(&self, owner: Option<&Owner>, records: Vec<Record>) -> Result<usize> {
        for r in &records {
            RecordDraft {
                kind: r.kind,
                category: r.category.clone(),
                amount: r.amount,
                rate: r.rate,
                note: r.note.clone(),
            }
            .validate()?;
        }
        let owned: Vec<Record> = records.into_iter().map(|r| r.with_owner(owner)).collect();
        self.store.append_all(&owned, owner)?;
        Ok(owned.len())
    }
}
