// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Owner, Record, Snapshot, VersionToken};
use crate::schema::{decode_csv, encode_csv};

use super::LedgerStore;

/// Single-tenant CSV on local disk.
///
/// Every append reads the whole file and rewrites it. Two processes writing
/// at once can lose rows; a crash mid-write can leave the file truncated.
#[derive(Debug, Clone)]
pub struct PlainFileStore {
    path: PathBuf,
}

impl PlainFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Record>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => decode_csv(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ledger file absent; treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode_csv(records)?)?;
        Ok(())
    }
}

impl LedgerStore for PlainFileStore {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load_all(&self, _owner: Option<&Owner>) -> Result<Snapshot> {
        Ok(Snapshot {
            records: self.read()?,
            version: None,
        })
    }

    fn append(
        &self,
        record: &Record,
        owner: Option<&Owner>,
        _version: Option<&VersionToken>,
    ) -> Result<()> {
        self.append_all(std::slice::from_ref(record), owner)
    }

    fn append_all(&self, records: &[Record], _owner: Option<&Owner>) -> Result<()> {
        let mut all = self.read()?;
        all.extend(records.iter().cloned().map(|r| r.with_owner(None)));
        self.write(&all)?;
        info!(path = %self.path.display(), added = records.len(), total = all.len(), "ledger file rewritten");
        Ok(())
    }
}
