// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::schema::{TableRow, format_timestamp};

use super::table::{TableFilter, TableService};

/// PostgREST endpoint of a hosted Postgres project.
pub struct SupabaseTable {
    client: Client,
    url: String,
    key: String,
    access_token: Option<String>,
}

impl SupabaseTable {
    pub fn new(client: Client, url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            access_token: None,
        }
    }

    /// Act as a signed-in user so row-level policies apply server side.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let bearer = self.access_token.as_deref().unwrap_or(&self.key);
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.key).map_err(LedgerError::unavailable)?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer)).map_err(LedgerError::unavailable)?,
        );
        Ok(headers)
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }
}

/// PostgREST query parameters for `filter`.
pub fn query_params(filter: &TableFilter) -> Vec<(String, String)> {
    let mut q = vec![("select".to_string(), "*".to_string())];
    if let Some(u) = &filter.user_id {
        q.push(("user_id".into(), format!("eq.{}", u)));
    }
    if let Some(t) = &filter.tipo {
        q.push(("tipo".into(), format!("eq.{}", t)));
    }
    if let Some(c) = &filter.categoria {
        q.push(("categoria".into(), format!("eq.{}", c)));
    }
    if let Some(m) = &filter.monto {
        q.push(("monto".into(), format!("eq.{}", m)));
    }
    if let Some(f) = &filter.fecha_gte {
        q.push(("fecha".into(), format!("gte.{}", format_timestamp(f))));
    }
    // `id` is the table's identity column, so ascending id is insertion order.
    let order = if filter.newest_first {
        "fecha.desc,id.desc"
    } else {
        "id.asc"
    };
    q.push(("order".into(), order.into()));
    q
}

impl TableService for SupabaseTable {
    fn select(&self, table: &str, filter: &TableFilter) -> Result<Vec<TableRow>> {
        let resp = self
            .client
            .get(self.endpoint(table))
            .headers(self.headers()?)
            .query(&query_params(filter))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().unwrap_or_default();
            return Err(LedgerError::StoreUnavailable(format!(
                "hosted table error: {} {}",
                status,
                txt.trim()
            )));
        }
        let rows: Vec<TableRow> = resp.json()?;
        debug!(table, rows = rows.len(), "hosted rows selected");
        Ok(rows)
    }

    fn insert(&self, table: &str, row: &TableRow) -> Result<TableRow> {
        let resp = self
            .client
            .post(self.endpoint(table))
            .headers(self.headers()?)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(row)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().unwrap_or_default();
            return Err(LedgerError::StoreUnavailable(format!(
                "hosted table error: {} {}",
                status,
                txt.trim()
            )));
        }
        let mut rows: Vec<TableRow> = resp.json()?;
        rows.pop()
            .ok_or_else(|| LedgerError::StoreUnavailable("insert returned no row".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn owner_filter_and_order_always_present() {
        let f = TableFilter {
            user_id: Some("u-1".into()),
            ..TableFilter::default()
        };
        let q = query_params(&f);
        assert!(q.contains(&("user_id".into(), "eq.u-1".into())));
        assert_eq!(q.last().unwrap(), &("order".to_string(), "id.asc".to_string()));
    }

    #[test]
    fn duplicate_probe_filters_are_encoded() {
        let since = chrono::NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let f = TableFilter {
            user_id: Some("u-1".into()),
            tipo: Some("Gasto".into()),
            categoria: Some("Comida".into()),
            monto: Some(Decimal::new(1250, 2)),
            fecha_gte: Some(since),
            newest_first: true,
        };
        let q = query_params(&f);
        assert!(q.contains(&("monto".into(), "eq.12.50".into())));
        assert!(q.contains(&("fecha".into(), "gte.2025-05-01 12:00:00".into())));
        assert!(q.contains(&("order".into(), "fecha.desc,id.desc".into())));
    }
}
