// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};
use crate::models::{Owner, Record, Snapshot, VersionToken};
use crate::schema::{decode_csv, encode_csv};

use super::LedgerStore;

/// A file fetched from a versioned store together with its revision.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub content: String,
    pub version: VersionToken,
}

/// A remote repository of files where every write names the revision it
/// replaces. Implementations return [`LedgerError::WriteConflict`] when that
/// revision is no longer current (or, on create, when the file already exists).
pub trait VersionedFileService {
    /// `Ok(None)` when the path does not exist on `branch`.
    fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>>;

    fn update_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        version: &VersionToken,
        branch: &str,
    ) -> Result<()>;

    fn create_file(&self, path: &str, content: &str, message: &str, branch: &str) -> Result<()>;
}

/// Single-tenant CSV kept in a versioned remote repository.
pub struct VersionedFileStore<S> {
    service: S,
    path: String,
    branch: String,
}

impl<S: VersionedFileService> VersionedFileStore<S> {
    pub fn new(service: S, path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            service,
            path: path.into(),
            branch: branch.into(),
        }
    }

    /// Re-fetch, merge and write back under the freshest revision. When the
    /// caller passes the token it loaded with, a newer revision is a conflict.
    fn merge_and_write(
        &self,
        records: &[Record],
        expected: Option<&VersionToken>,
        now: NaiveDateTime,
    ) -> Result<()> {
        let current = self.service.get_file(&self.path, &self.branch)?;
        let stamp = now.format("%Y-%m-%d %H:%M");

        match current {
            Some(file) => {
                if let Some(expected) = expected {
                    if expected != &file.version {
                        warn!(path = %self.path, "stale version token; refusing to overwrite");
                        return Err(LedgerError::WriteConflict);
                    }
                }
                let mut all = decode_csv(&file.content)?;
                all.extend(records.iter().cloned().map(|r| r.with_owner(None)));
                let message = format!("Actualizar registros - {}", stamp);
                self.service.update_file(
                    &self.path,
                    &encode_csv(&all)?,
                    &message,
                    &file.version,
                    &self.branch,
                )?;
                info!(path = %self.path, total = all.len(), "remote ledger updated");
            }
            None => {
                if expected.is_some() {
                    warn!(path = %self.path, "remote ledger vanished since it was loaded");
                    return Err(LedgerError::WriteConflict);
                }
                let all: Vec<Record> = records.iter().cloned().map(|r| r.with_owner(None)).collect();
                let message = format!("Crear archivo de registros - {}", stamp);
                self.service
                    .create_file(&self.path, &encode_csv(&all)?, &message, &self.branch)?;
                info!(path = %self.path, total = all.len(), "remote ledger created");
            }
        }
        Ok(())
    }
}

impl<S: VersionedFileService> LedgerStore for VersionedFileStore<S> {
    fn describe(&self) -> String {
        format!("versioned {}@{}", self.path, self.branch)
    }

    fn load_all(&self, _owner: Option<&Owner>) -> Result<Snapshot> {
        match self.service.get_file(&self.path, &self.branch)? {
            Some(file) => {
                let records = decode_csv(&file.content)?;
                debug!(path = %self.path, rows = records.len(), version = file.version.as_str(), "remote ledger loaded");
                Ok(Snapshot {
                    records,
                    version: Some(file.version),
                })
            }
            None => Ok(Snapshot::empty()),
        }
    }

    fn append(
        &self,
        record: &Record,
        _owner: Option<&Owner>,
        version: Option<&VersionToken>,
    ) -> Result<()> {
        self.merge_and_write(
            std::slice::from_ref(record),
            version,
            Local::now().naive_local(),
        )
    }

    fn append_all(&self, records: &[Record], _owner: Option<&Owner>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.merge_and_write(records, None, Local::now().naive_local())
    }
}
