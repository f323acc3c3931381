// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::models::VersionToken;

use super::versioned::{RemoteFile, VersionedFileService};

pub const DEFAULT_API: &str = "https://api.github.com";

/// Contents API of a GitHub repository.
pub struct GithubContents {
    client: Client,
    api: String,
    repo: String,
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentResponse {
    pub sha: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

impl GithubContents {
    pub fn new(client: Client, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api: DEFAULT_API.to_string(),
            repo: repo.into(),
            token: token.into(),
        }
    }

    /// Point at a GitHub Enterprise host or a local stand-in.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = api.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    fn put(&self, path: &str, body: &PutRequest<'_>) -> Result<()> {
        let resp = self
            .client
            .put(self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .json(body)
            .send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let txt = resp.text().unwrap_or_default();
        Err(write_error(status, &txt))
    }
}

/// Decode a contents payload; the API wraps base64 at 60 columns.
pub fn decode_content(resp: ContentResponse) -> Result<RemoteFile> {
    if let Some(enc) = resp.encoding.as_deref() {
        if enc != "base64" {
            return Err(LedgerError::StoreUnavailable(format!(
                "unsupported content encoding '{}'",
                enc
            )));
        }
    }
    let packed: String = resp.content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(packed.as_bytes())
        .map_err(LedgerError::unavailable)?;
    let content = String::from_utf8(bytes).map_err(LedgerError::unavailable)?;
    Ok(RemoteFile {
        content,
        version: VersionToken::new(resp.sha),
    })
}

/// 409 is a stale sha; 422 is a create racing an existing file.
/// 409 is a stale sha. A 422 only counts as a conflict when it complains about
/// the sha (creating a file someone else just created); other 422s are bad
/// paths or branches.
pub fn write_error(status: StatusCode, body: &str) -> LedgerError {
    match status {
        StatusCode::CONFLICT => LedgerError::WriteConflict,
        StatusCode::UNPROCESSABLE_ENTITY if body.contains("sha") => LedgerError::WriteConflict,
        _ => LedgerError::StoreUnavailable(format!("github error: {} {}", status, body.trim())),
    }
}

impl VersionedFileService for GithubContents {
    fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>> {
        let resp = self
            .client
            .get(self.url(path))
            .query(&[("ref", branch)])
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(repo = %self.repo, path, branch, "remote ledger not found");
            return Ok(None);
        }
        if !status.is_success() {
            let txt = resp.text().unwrap_or_default();
            return Err(LedgerError::StoreUnavailable(format!(
                "github error: {} {}",
                status,
                txt.trim()
            )));
        }
        let body: ContentResponse = resp.json()?;
        decode_content(body).map(Some)
    }

    fn update_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        version: &VersionToken,
        branch: &str,
    ) -> Result<()> {
        self.put(
            path,
            &PutRequest {
                message,
                content: STANDARD.encode(content),
                branch,
                sha: Some(version.as_str()),
            },
        )
    }

    fn create_file(&self, path: &str, content: &str, message: &str, branch: &str) -> Result<()> {
        self.put(
            path,
            &PutRequest {
                message,
                content: STANDARD.encode(content),
                branch,
                sha: None,
            },
        )
    }
}
