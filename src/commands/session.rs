// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::config::Settings;
use crate::models::Owner;
use crate::session::{Session, SessionFile};

pub fn handle(sessions: &SessionFile, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let user = sub
                .get_one::<String>("user-id")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow::anyhow!("--user-id must not be empty"))?;
            let email = sub.get_one::<String>("email").map(|s| s.trim().to_string());
            let session = Session::start(Owner::new(user), email, Utc::now());
            sessions.save(&session)?;
            println!("Signed in as {}", session.user_id);
            if !settings.is_multi_tenant() {
                println!("Note: the configured store is single-tenant; records are not scoped.");
            }
        }
        Some(("logout", _)) => {
            if sessions.clear()? {
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }
        Some(("status", _)) => match sessions.load()? {
            Some(s) if s.is_expired(Utc::now(), settings.session_timeout()) => {
                println!("Session for {} has expired", s.user_id)
            }
            Some(s) => println!(
                "Signed in as {}{} (last active {})",
                s.user_id,
                s.email.map(|e| format!(" <{}>", e)).unwrap_or_default(),
                s.last_activity.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
