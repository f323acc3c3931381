// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::ledger::Ledger;
use crate::models::Owner;
use crate::store::LedgerStore;
use crate::summary::fmt_money;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let ov = ledger.overview(owner);
    if let Some(w) = &ov.warning {
        eprintln!("Warning: could not read the ledger ({})", w);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov.summary)? {
        return Ok(());
    }
    if ov.records.is_empty() {
        println!("Welcome. Start recording your movements.");
        return Ok(());
    }
    let s = &ov.summary;
    let rows = vec![
        vec!["Income".to_string(), fmt_money(&s.total_income)],
        vec!["Expenses".to_string(), fmt_money(&s.total_expense)],
        vec!["Savings/Inv".to_string(), fmt_money(&s.total_savings)],
    ];
    println!("{}", pretty_table(&["", "Total"], rows));
    println!("AVAILABLE: {}", fmt_money(&s.available));
    Ok(())
}
