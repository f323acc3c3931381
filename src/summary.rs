// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Kind, Record};
use crate::schema::format_timestamp;

/// Running totals over a caller's records. Sums saturate at the `Decimal`
/// bounds instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Savings and investments together.
    pub total_savings: Decimal,
    pub available: Decimal,
}

pub fn summarize(records: &[Record]) -> Summary {
    let mut s = Summary::default();
    for r in records {
        let total = if r.kind.is_set_aside() {
            &mut s.total_savings
        } else if r.kind == Kind::Income {
            &mut s.total_income
        } else {
            &mut s.total_expense
        };
        *total = total.saturating_add(r.amount);
    }
    s.available = s
        .total_income
        .saturating_sub(s.total_expense)
        .saturating_sub(s.total_savings);
    s
}

/// One line of the history view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub fecha: String,
    pub tipo: String,
    pub categoria: String,
    pub monto: Decimal,
    pub tasa: Decimal,
    pub nota: String,
    /// `monto * tasa`
    pub total_secundario: Decimal,
}

/// Records as shown in the history, newest first.
pub fn history(records: &[Record]) -> Vec<HistoryRow> {
    records
        .iter()
        .rev()
        .map(|r| HistoryRow {
            fecha: format_timestamp(&r.timestamp),
            tipo: r.kind.label().to_string(),
            categoria: r.category.clone(),
            monto: r.amount,
            tasa: r.rate,
            nota: r.note.clone().unwrap_or_default(),
            total_secundario: r.secondary_amount(),
        })
        .collect()
}

/// `1234.5` -> `$1,234.50`; negatives keep the sign in front of the symbol.
pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    let neg = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{}", if neg { "-" } else { "" }, grouped, frac)
}
