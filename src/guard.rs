// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::models::{Owner, Record};
use crate::store::{DuplicateProbe, LedgerStore};

pub const DEFAULT_WINDOW_SECS: i64 = 5;

/// Outcome of a duplicate check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Clear,
    /// The most recent matching record.
    Duplicate(Record),
}

/// Rejects a submission that repeats a record made moments ago (double
/// clicks). Best effort: two submissions racing each other can both pass,
/// and any failure while looking lets the submission through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateGuard {
    window: Duration,
}

impl Default for DuplicateGuard {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_WINDOW_SECS))
    }
}

impl DuplicateGuard {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn probe_for(&self, candidate: &Record, now: NaiveDateTime) -> DuplicateProbe {
        DuplicateProbe {
            kind: candidate.kind,
            category: candidate.category.clone(),
            amount: candidate.amount,
            since: now - self.window,
            until: now,
        }
    }

    pub fn check<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        owner: Option<&Owner>,
        candidate: &Record,
        now: NaiveDateTime,
    ) -> Verdict {
        let probe = self.probe_for(candidate, now);
        match store.recent_matches(owner, &probe) {
            Ok(mut found) if !found.is_empty() => {
                debug!(matches = found.len(), category = %candidate.category, "duplicate suspected");
                Verdict::Duplicate(found.swap_remove(0))
            }
            Ok(_) => Verdict::Clear,
            Err(e) => {
                warn!(error = %e, "duplicate check failed; letting submission through");
                Verdict::Clear
            }
        }
    }
}
