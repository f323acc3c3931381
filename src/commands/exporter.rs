// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};

use crate::ledger::Ledger;
use crate::models::Owner;
use crate::schema::encode_csv;
use crate::store::LedgerStore;
use crate::summary::history;

pub fn handle<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map_or("csv", |s| s.as_str())
        .trim()
        .to_lowercase();
    let out = sub.get_one::<String>("out").context("--out is required")?.trim();

    // Read failures abort here instead of producing an empty export.
    let snap = ledger
        .store()
        .load_all(owner)
        .context("Could not read the ledger")?;

    match fmt.as_str() {
        "csv" => {
            std::fs::write(out, encode_csv(&snap.records)?)
                .with_context(|| format!("Write {}", out))?;
        }
        "json" => {
            let mut rows = history(&snap.records);
            rows.reverse();
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} records to {}", snap.records.len(), out);
    Ok(())
}
