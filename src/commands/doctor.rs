// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::config::Settings;
use crate::models::Owner;
use crate::store::LedgerStore;
use crate::utils::pretty_table;

pub fn report<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    owner: Option<&Owner>,
) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["store".to_string(), store.describe()]];

    match store.load_all(owner) {
        Ok(snap) => {
            rows.push(vec!["reachable".into(), "yes".into()]);
            rows.push(vec!["records".into(), snap.records.len().to_string()]);
            if let Some(v) = snap.version {
                rows.push(vec!["version".into(), v.as_str().to_string()]);
            }
        }
        Err(e) => rows.push(vec!["reachable".into(), format!("no: {}", e)]),
    }

    let identity = match owner {
        Some(o) => o.to_string(),
        None if settings.is_multi_tenant() => "none (nothing is visible until you sign in)".into(),
        None => "none".into(),
    };
    rows.push(vec!["identity".into(), identity]);
    rows.push(vec![
        "duplicate window".into(),
        format!("{}s", settings.guard.window_secs),
    ]);
    rows
}

pub fn handle<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    owner: Option<&Owner>,
) -> Result<()> {
    println!("{}", pretty_table(&["Check", "Detail"], report(store, settings, owner)));
    Ok(())
}
