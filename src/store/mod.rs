// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence of the record sequence.
//!
//! Callers only see [`LedgerStore`]. Whether the records live in a local CSV,
//! a CSV in a versioned remote repository, or a hosted table with one row per
//! record is decided once at startup.

pub mod file;
pub mod github;
pub mod sqlite;
pub mod supabase;
pub mod table;
pub mod versioned;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Kind, Owner, Record, Snapshot, VersionToken};

pub use file::PlainFileStore;
pub use table::{HostedTableStore, TableFilter, TableService};
pub use versioned::{RemoteFile, VersionedFileService, VersionedFileStore};

/// Candidate duplicates: same kind, category and amount at or after `since`.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateProbe {
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
}

impl DuplicateProbe {
    pub fn matches(&self, r: &Record) -> bool {
        r.kind == self.kind
            && r.category == self.category
            && r.amount == self.amount
            && r.timestamp >= self.since
            && r.timestamp <= self.until
    }
}

pub trait LedgerStore {
    /// Short name for logs and `doctor`.
    fn describe(&self) -> String;

    /// Every record visible to `owner`, in insertion order. A store that does
    /// not exist yet is an empty snapshot, not an error.
    fn load_all(&self, owner: Option<&Owner>) -> Result<Snapshot>;

    /// Append one record. `version` is the token the caller last saw, if any;
    /// versioned stores refuse to write over a newer revision.
    fn append(
        &self,
        record: &Record,
        owner: Option<&Owner>,
        version: Option<&VersionToken>,
    ) -> Result<()>;

    /// Append a batch in order. Stores that rewrite whole files override this
    /// to write once.
    fn append_all(&self, records: &[Record], owner: Option<&Owner>) -> Result<()> {
        for r in records {
            self.append(r, owner, None)?;
        }
        Ok(())
    }

    /// Records matching `probe` for `owner`, most recent first.
    fn recent_matches(&self, owner: Option<&Owner>, probe: &DuplicateProbe) -> Result<Vec<Record>> {
        let snap = self.load_all(owner)?;
        Ok(snap
            .records
            .into_iter()
            .rev()
            .filter(|r| probe.matches(r))
            .collect())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load_all(&self, owner: Option<&Owner>) -> Result<Snapshot> {
        (**self).load_all(owner)
    }

    fn append(
        &self,
        record: &Record,
        owner: Option<&Owner>,
        version: Option<&VersionToken>,
    ) -> Result<()> {
        (**self).append(record, owner, version)
    }

    fn append_all(&self, records: &[Record], owner: Option<&Owner>) -> Result<()> {
        (**self).append_all(records, owner)
    }

    fn recent_matches(&self, owner: Option<&Owner>, probe: &DuplicateProbe) -> Result<Vec<Record>> {
        (**self).recent_matches(owner, probe)
    }
}
