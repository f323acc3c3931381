// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::schema::{TableRow, format_timestamp, parse_amount};

use super::table::{TableFilter, TableService};

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// The hosted-table contract on a local SQLite file, for running the
/// multi-tenant layout without a network service.
pub struct SqliteTable {
    conn: Connection,
}

impl SqliteTable {
    pub fn open(path: &Path, table: &str) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create data dir")?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        Self::init(conn, table)
    }

    pub fn open_in_memory(table: &str) -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?, table)
    }

    fn init(conn: Connection, table: &str) -> anyhow::Result<Self> {
        check_ident(table)?;
        conn.execute_batch(&format!(
            r#"
        CREATE TABLE IF NOT EXISTS {table}(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            fecha TEXT NOT NULL,
            tipo TEXT NOT NULL CHECK(tipo IN ('Ingreso','Gasto','Ahorro','Inversion')),
            categoria TEXT NOT NULL,
            monto TEXT NOT NULL,
            tasa TEXT NOT NULL DEFAULT '0',
            descripcion TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_{table}_owner ON {table}(user_id, fecha);
        "#
        ))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn check_ident(table: &str) -> Result<()> {
    if IDENT.is_match(table) {
        Ok(())
    } else {
        Err(LedgerError::StoreUnavailable(format!(
            "invalid table name '{}'",
            table
        )))
    }
}

impl TableService for SqliteTable {
    fn select(&self, table: &str, filter: &TableFilter) -> Result<Vec<TableRow>> {
        check_ident(table)?;
        let mut sql = format!(
            "SELECT user_id, fecha, tipo, categoria, monto, tasa, descripcion FROM {} WHERE 1=1",
            table
        );
        let mut params_vec: Vec<String> = Vec::new();

        if let Some(u) = &filter.user_id {
            sql.push_str(" AND user_id=?");
            params_vec.push(u.clone());
        }
        if let Some(t) = &filter.tipo {
            sql.push_str(" AND tipo=?");
            params_vec.push(t.clone());
        }
        if let Some(c) = &filter.categoria {
            sql.push_str(" AND categoria=?");
            params_vec.push(c.clone());
        }
        if let Some(f) = &filter.fecha_gte {
            sql.push_str(" AND fecha>=?");
            params_vec.push(format_timestamp(f));
        }
        if filter.newest_first {
            sql.push_str(" ORDER BY fecha DESC, id DESC");
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

        let mut data = Vec::new();
        let mut n = 0usize;
        while let Some(r) = rows.next()? {
            n += 1;
            let monto_raw: String = r.get(4)?;
            let tasa_raw: String = r.get(5)?;
            let monto = parse_amount(&monto_raw).ok_or_else(|| LedgerError::Malformed {
                row: n,
                reason: format!("invalid monto '{}'", monto_raw),
            })?;
            let tasa = parse_amount(&tasa_raw).ok_or_else(|| LedgerError::Malformed {
                row: n,
                reason: format!("invalid tasa '{}'", tasa_raw),
            })?;
            // Text column: compare numerically here so 20.0 matches 20.00.
            if filter.monto.is_some_and(|m| m != monto) {
                continue;
            }
            data.push(TableRow {
                user_id: r.get(0)?,
                fecha: r.get(1)?,
                tipo: r.get(2)?,
                categoria: r.get(3)?,
                monto,
                tasa: Some(tasa),
                descripcion: r.get(6)?,
            });
        }
        debug!(table, rows = data.len(), "sqlite rows selected");
        Ok(data)
    }

    fn insert(&self, table: &str, row: &TableRow) -> Result<TableRow> {
        check_ident(table)?;
        self.conn.execute(
            &format!(
                "INSERT INTO {}(user_id, fecha, tipo, categoria, monto, tasa, descripcion) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                table
            ),
            params![
                row.user_id,
                row.fecha,
                row.tipo,
                row.categoria,
                row.monto.to_string(),
                row.tasa.unwrap_or_default().to_string(),
                row.descripcion
            ],
        )?;
        Ok(row.clone())
    }
}
