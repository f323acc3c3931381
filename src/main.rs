// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use pumbacash::config::{self, Settings};
use pumbacash::session::{Resumed, SessionFile};
use pumbacash::{Ledger, cli, commands, logging};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    logging::init_tracing(matches.get_flag("verbose"));

    let settings = Settings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let data_dir = config::data_dir()?;
    let sessions = SessionFile::new(data_dir.join("session.json"));

    match matches.subcommand() {
        Some(("session", sub)) => return commands::session::handle(&sessions, &settings, sub),
        Some(("presets", _)) => {
            commands::presets::handle();
            return Ok(());
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let resumed = sessions.resume(Utc::now(), settings.session_timeout())?;
    if let Resumed::Expired(s) = &resumed {
        eprintln!("Session for {} expired; continuing signed out.", s.user_id);
    }
    let owner = resumed.owner().cloned();
    let ledger = Ledger::new(settings.build_store(&data_dir)?, settings.guard());

    match matches.subcommand() {
        Some(("add", sub)) => {
            commands::records::add(&ledger, owner.as_ref(), sub)?;
        }
        Some(("history", sub)) => commands::records::list(&ledger, owner.as_ref(), sub)?,
        Some(("summary", sub)) => commands::summary::handle(&ledger, owner.as_ref(), sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, owner.as_ref(), sub)?,
        Some(("import", sub)) => {
            commands::importer::handle(&ledger, owner.as_ref(), sub)?;
        }
        Some(("doctor", _)) => commands::doctor::handle(ledger.store(), &settings, owner.as_ref())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
