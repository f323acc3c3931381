// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::Owner;

pub const DEFAULT_TIMEOUT_MINUTES: i64 = 30;

/// True once more than `timeout` has passed since the last activity.
pub fn is_expired(now: DateTime<Utc>, last_activity: DateTime<Utc>, timeout: Duration) -> bool {
    now - last_activity > timeout
}

/// A signed-in identity and when it was last used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Owner,
    #[serde(default)]
    pub email: Option<String>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn start(user_id: Owner, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            last_activity: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        is_expired(now, self.last_activity, timeout)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

/// What [`SessionFile::resume`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum Resumed {
    Active(Session),
    Expired(Session),
    None,
}

impl Resumed {
    pub fn owner(&self) -> Option<&Owner> {
        match self {
            Resumed::Active(s) => Some(&s.user_id),
            _ => None,
        }
    }
}

/// Session persisted between invocations as JSON.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Read {}", self.path.display())),
        }
    }

    pub fn load(&self) -> Result<Option<Session>> {
        let Some(data) = self.read()? else {
            return Ok(None);
        };
        let session = serde_json::from_str(&data)
            .with_context(|| format!("Invalid session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create session dir")?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)
            .with_context(|| format!("Write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Remove {}", self.path.display())),
        }
    }

    /// Re-evaluated on every request: an active session is refreshed, an
    /// expired one is removed. A file that does not parse is removed too and
    /// reads as signed out.
    pub fn resume(&self, now: DateTime<Utc>, timeout: Duration) -> Result<Resumed> {
        let Some(data) = self.read()? else {
            return Ok(Resumed::None);
        };
        let mut session: Session = match serde_json::from_str(&data) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable session file; signing out");
                self.clear()?;
                return Ok(Resumed::None);
            }
        };
        if session.is_expired(now, timeout) {
            info!(user = %session.user_id, "session expired");
            self.clear()?;
            return Ok(Resumed::Expired(session));
        }
        session.touch(now);
        self.save(&session)?;
        debug!(user = %session.user_id, "session refreshed");
        Ok(Resumed::Active(session))
    }
}
