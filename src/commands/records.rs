// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::{Kind, Owner, Record, RecordDraft};
use crate::presets;
use crate::store::LedgerStore;
use crate::summary::{HistoryRow, fmt_money, history};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

/// Build the form input from `add` arguments.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<RecordDraft> {
    let amount = parse_decimal(sub.get_one::<String>("amount").map_or("", |s| s.as_str()))?;
    let rate = parse_decimal(sub.get_one::<String>("rate").map_or("0", |s| s.as_str()))?;
    let (kind, category) = if let Some(key) = sub.get_one::<String>("preset") {
        let p = presets::find(key)
            .ok_or_else(|| anyhow!("Unknown preset '{}'; see `pumbacash presets`", key.trim()))?;
        (p.kind, p.category.to_string())
    } else {
        let kind: Kind = sub
            .get_one::<String>("kind")
            .ok_or_else(|| anyhow!("--kind or --preset is required"))?
            .parse()
            .map_err(|e: String| anyhow!(e))?;
        let category = sub
            .get_one::<String>("category")
            .ok_or_else(|| anyhow!("--category is required with --kind"))?;
        (kind, category.trim().to_string())
    };
    let mut draft = RecordDraft::new(kind, category, amount, rate);
    if let Some(note) = sub.get_one::<String>("note") {
        draft = draft.note(note.as_str());
    }
    Ok(draft)
}

pub fn confirmation(rec: &Record) -> String {
    match rec.kind {
        Kind::Income => format!("Income recorded: {} ({})", rec.category, fmt_money(&rec.amount)),
        Kind::Expense => format!("Expense recorded: {} ({})", rec.category, fmt_money(&-rec.amount)),
        Kind::Saving | Kind::Investment => {
            format!("Savings recorded: {} ({})", rec.category, fmt_money(&rec.amount))
        }
    }
}

/// Submit one record. A suspected duplicate is a warning, not a failure.
pub fn add<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Result<Option<Record>> {
    let draft = draft_from_args(sub)?;
    match ledger.submit(owner, draft, None) {
        Ok(rec) => {
            println!("{}", confirmation(&rec));
            Ok(Some(rec))
        }
        Err(e @ LedgerError::DuplicateSuspected { .. }) => {
            eprintln!("Warning: {}", e);
            Ok(None)
        }
        Err(LedgerError::Validation(v)) => bail!("{}", v),
        Err(LedgerError::WriteConflict) => {
            bail!("Someone else saved at the same time; please retry")
        }
        Err(LedgerError::MissingOwner) => {
            bail!("Sign in first: pumbacash session login --user-id <id>")
        }
        Err(e) => Err(anyhow!(e).context("Could not save the record")),
    }
}

pub fn query_rows<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Vec<HistoryRow> {
    let ov = ledger.overview(owner);
    if let Some(w) = &ov.warning {
        eprintln!("Warning: could not read the ledger ({})", w);
    }
    let mut rows = history(&ov.records);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    rows
}

pub fn list<S: LedgerStore>(
    ledger: &Ledger<S>,
    owner: Option<&Owner>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, owner, sub);
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No records yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.fecha.clone(),
                r.tipo.clone(),
                r.categoria.clone(),
                format!("{:.2}", r.monto),
                format!("{:.2}", r.tasa),
                format!("{:.2}", r.total_secundario),
                r.nota.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Fecha", "Tipo", "Categoria", "Monto", "Tasa", "Total Bs", "Nota"],
            rows,
        )
    );
    Ok(())
}
