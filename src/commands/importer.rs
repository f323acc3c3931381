// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::ledger::Ledger;
use crate::models::Owner;
use crate::schema::decode_csv;
use crate::store::LedgerStore;

pub fn handle<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Result<usize> {
    let path = sub.get_one::<String>("path").context("--path is required")?.trim();
    let content = std::fs::read_to_string(path).with_context(|| format!("Open CSV {}", path))?;
    let records = decode_csv(&content).with_context(|| format!("Parse CSV {}", path))?;
    let n = ledger
        .import(owner, records)
        .with_context(|| format!("Import {}", path))?;
    println!("Imported {} records from {}", n, path);
    Ok(n)
}
