// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod presets;
pub mod schema;
pub mod session;
pub mod store;
pub mod summary;
pub mod utils;

pub use error::{LedgerError, Result, ValidationError};
pub use ledger::{Ledger, Overview};
pub use models::{Kind, Owner, Record, RecordDraft, Snapshot, VersionToken};
pub use store::LedgerStore;
pub use summary::{Summary, summarize};
