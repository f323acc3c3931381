// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Duration;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::guard::{DEFAULT_WINDOW_SECS, DuplicateGuard};
use crate::session::DEFAULT_TIMEOUT_MINUTES;
use crate::store::github::GithubContents;
use crate::store::sqlite::SqliteTable;
use crate::store::supabase::SupabaseTable;
use crate::store::{HostedTableStore, LedgerStore, PlainFileStore, VersionedFileStore};
use crate::utils::http_client;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.pumbacash", "Pumbacash", "pumbacash"));
static REPO_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

pub const DEFAULT_CSV: &str = "registros.csv";
pub const DEFAULT_TABLE: &str = "registros";

pub const ENV_GITHUB_TOKEN: &str = "PUMBACASH_GITHUB_TOKEN";
pub const ENV_SUPABASE_KEY: &str = "PUMBACASH_SUPABASE_KEY";
pub const ENV_SUPABASE_ACCESS_TOKEN: &str = "PUMBACASH_SUPABASE_ACCESS_TOKEN";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let dir = proj.data_dir();
    fs::create_dir_all(dir).context("Failed to create data dir")?;
    Ok(dir.to_path_buf())
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn default_branch() -> String {
    "main".into()
}

fn default_csv() -> String {
    DEFAULT_CSV.into()
}

fn default_table() -> String {
    DEFAULT_TABLE.into()
}

/// Which backend holds the records, and how to reach it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreSettings {
    File {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Github {
        repo: String,
        #[serde(default = "default_branch")]
        branch: String,
        #[serde(default = "default_csv")]
        path: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        api: Option<String>,
    },
    Supabase {
        url: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        access_token: Option<String>,
        #[serde(default = "default_table")]
        table: String,
    },
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
        #[serde(default = "default_table")]
        table: String,
    },
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings::File { path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    pub window_secs: i64,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub timeout_minutes: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub guard: GuardSettings,
    pub session: SessionSettings,
}

impl Settings {
    /// Read `path`, or the platform config file when `None`. A missing file
    /// means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let mut settings = match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e).with_context(|| format!("Read config {}", path.display())),
        };
        settings.apply_env(|k| std::env::var(k).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Secrets from the environment win over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        match &mut self.store {
            StoreSettings::Github { token, .. } => {
                if let Some(v) = lookup(ENV_GITHUB_TOKEN) {
                    *token = Some(v);
                }
            }
            StoreSettings::Supabase {
                key, access_token, ..
            } => {
                if let Some(v) = lookup(ENV_SUPABASE_KEY) {
                    *key = Some(v);
                }
                if let Some(v) = lookup(ENV_SUPABASE_ACCESS_TOKEN) {
                    *access_token = Some(v);
                }
            }
            _ => {}
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.guard.window_secs < 0 {
            bail!("guard.window_secs must not be negative");
        }
        if self.session.timeout_minutes <= 0 {
            bail!("session.timeout_minutes must be positive");
        }
        if let StoreSettings::Github { repo, .. } = &self.store {
            if !REPO_SLUG.is_match(repo) {
                bail!("Invalid repository '{}', expected owner/name", repo);
            }
        }
        Ok(())
    }

    pub fn guard(&self) -> DuplicateGuard {
        DuplicateGuard::new(Duration::seconds(self.guard.window_secs))
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::minutes(self.session.timeout_minutes)
    }

    pub fn is_multi_tenant(&self) -> bool {
        matches!(
            self.store,
            StoreSettings::Supabase { .. } | StoreSettings::Sqlite { .. }
        )
    }

    /// Construct the configured store. Relative file paths resolve against
    /// `data_dir`.
    pub fn build_store(&self, data_dir: &Path) -> Result<Box<dyn LedgerStore>> {
        let resolve = |p: &Option<PathBuf>, default: &str| match p {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => data_dir.join(p),
            None => data_dir.join(default),
        };
        let store: Box<dyn LedgerStore> = match &self.store {
            StoreSettings::File { path } => Box::new(PlainFileStore::new(resolve(path, DEFAULT_CSV))),
            StoreSettings::Github {
                repo,
                branch,
                path,
                token,
                api,
            } => {
                let token = token
                    .clone()
                    .ok_or_else(|| anyhow!("GitHub token missing; set {}", ENV_GITHUB_TOKEN))?;
                let mut svc = GithubContents::new(http_client()?, repo.clone(), token);
                if let Some(api) = api {
                    svc = svc.with_api(api.clone());
                }
                Box::new(VersionedFileStore::new(svc, path.clone(), branch.clone()))
            }
            StoreSettings::Supabase {
                url,
                key,
                access_token,
                table,
            } => {
                let key = key
                    .clone()
                    .ok_or_else(|| anyhow!("Supabase key missing; set {}", ENV_SUPABASE_KEY))?;
                let mut svc = SupabaseTable::new(http_client()?, url.clone(), key);
                if let Some(t) = access_token {
                    svc = svc.with_access_token(t.clone());
                }
                Box::new(HostedTableStore::new(svc, table.clone()))
            }
            StoreSettings::Sqlite { path, table } => {
                let svc = SqliteTable::open(&resolve(path, "pumbacash.sqlite"), table)?;
                Box::new(HostedTableStore::new(svc, table.clone()))
            }
        };
        Ok(store)
    }
}
