// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The tabular layout shared by every backend.
//!
//! File-based stores hold a CSV with the columns in [`COLUMNS`]; the hosted
//! table uses lowercase names plus `user_id` (see [`TableRow`]). Both map to
//! the same [`Record`].

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::{Kind, Owner, Record};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const COLUMNS: [&str; 6] = ["Fecha", "Tipo", "Categoria", "Monto", "Tasa", "Nota"];

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts the canonical format plus the ISO shapes hosted tables hand back.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.naive_local()))
}

pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Serialize records into the CSV layout, header included.
pub fn encode_csv(records: &[Record]) -> Result<String> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(COLUMNS)?;
    for r in records {
        wtr.write_record([
            format_timestamp(&r.timestamp),
            r.kind.label().to_string(),
            r.category.clone(),
            r.amount.to_string(),
            r.rate.to_string(),
            r.note.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| LedgerError::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| LedgerError::Malformed {
        row: 0,
        reason: e.to_string(),
    })
}

/// Parse CSV content. Blank content is an empty ledger. Columns are located
/// by header name so extra columns and reordering are tolerated.
pub fn decode_csv(content: &str) -> Result<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let idx: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|c| headers.iter().position(|h| h.trim() == *c))
        .collect();
    for (col, i) in COLUMNS.iter().zip(&idx).take(5) {
        if i.is_none() {
            return Err(LedgerError::Malformed {
                row: 0,
                reason: format!("missing column '{}'", col),
            });
        }
    }

    let mut out = Vec::new();
    for (n, row) in rdr.records().enumerate() {
        let row = row?;
        out.push(decode_row(&row, &idx, n + 1)?);
    }
    Ok(out)
}

fn decode_row(row: &StringRecord, idx: &[Option<usize>], n: usize) -> Result<Record> {
    let field = |i: usize| idx[i].and_then(|c| row.get(c)).unwrap_or("").trim();
    let bad = |reason: String| LedgerError::Malformed { row: n, reason };

    let timestamp =
        parse_timestamp(field(0)).ok_or_else(|| bad(format!("invalid Fecha '{}'", field(0))))?;
    let kind: Kind = field(1).parse().map_err(bad)?;
    let amount = parse_amount(field(3)).ok_or_else(|| bad(format!("invalid Monto '{}'", field(3))))?;
    let rate = if field(4).is_empty() {
        Decimal::ZERO
    } else {
        parse_amount(field(4)).ok_or_else(|| bad(format!("invalid Tasa '{}'", field(4))))?
    };
    let note = Some(field(5).to_string()).filter(|s| !s.is_empty());

    Ok(Record {
        timestamp,
        kind,
        category: field(2).to_string(),
        amount,
        rate,
        note,
        owner: None,
    })
}

/// Row shape of the hosted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub user_id: String,
    pub fecha: String,
    pub tipo: String,
    pub categoria: String,
    pub monto: Decimal,
    /// Null or absent reads as a zero rate.
    #[serde(default)]
    pub tasa: Option<Decimal>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl TableRow {
    pub fn from_record(record: &Record, owner: &Owner) -> Self {
        Self {
            user_id: owner.as_str().to_string(),
            fecha: format_timestamp(&record.timestamp),
            tipo: record.kind.label().to_string(),
            categoria: record.category.clone(),
            monto: record.amount,
            tasa: Some(record.rate),
            descripcion: record.note.clone(),
        }
    }

    pub fn into_record(self, row: usize) -> Result<Record> {
        let timestamp = parse_timestamp(&self.fecha).ok_or_else(|| LedgerError::Malformed {
            row,
            reason: format!("invalid fecha '{}'", self.fecha),
        })?;
        let kind: Kind = self
            .tipo
            .parse()
            .map_err(|reason| LedgerError::Malformed { row, reason })?;
        Ok(Record {
            timestamp,
            kind,
            category: self.categoria,
            amount: self.monto,
            rate: self.tasa.unwrap_or(Decimal::ZERO),
            note: self.descripcion.filter(|d| !d.trim().is_empty()),
            owner: Some(Owner::new(self.user_id)),
        })
    }
}
