// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Zed Lake Adapter
//
// Anti-Corruption Layer for the Zed lake HTTP API.
// Loads go to /pool/{pool}/branch/{branch}, queries to /query.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::lake::{LakeClient, LakeError, DEFAULT_BRANCH};

/// Characters left unescaped in pool and branch path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const COMMIT_AUTHOR: &str = "digi";
const COMMIT_BODY: &str = "autocommit";

pub struct ZedLakeClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ZedCommit<'a> {
    author: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct ZedQueryRequest<'a> {
    query: &'a str,
    head: ZedQueryHead<'a>,
}

/// Default pool for expressions without a `from` clause.
#[derive(Serialize)]
struct ZedQueryHead<'a> {
    pool: &'a str,
    branch: &'a str,
}

impl ZedLakeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn load_url(&self, stream: &str, branch: &str) -> String {
        format!(
            "{}/pool/{}/branch/{}",
            self.base_url.trim_end_matches('/'),
            utf8_percent_encode(stream, PATH_SEGMENT),
            utf8_percent_encode(branch, PATH_SEGMENT),
        )
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LakeError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(LakeError::Status { status, body })
    }
}

#[async_trait]
impl LakeClient for ZedLakeClient {
    async fn write(&self, stream: &str, data: &str, branch: &str) -> Result<(), LakeError> {
        let url = self.load_url(stream, branch);
        let commit = serde_json::to_string(&ZedCommit {
            author: COMMIT_AUTHOR,
            body: COMMIT_BODY,
        })
        .map_err(|e| LakeError::Decode(e.to_string()))?;

        debug!("Loading {} bytes into {}", data.len(), url);

        let response = self
            .client
            .post(&url)
            .header("Zed-Commit", commit)
            .body(data.to_string())
            .send()
            .await
            .map_err(|e| LakeError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn query(&self, stream: &str, expression: &str) -> Result<Vec<Value>, LakeError> {
        let url = format!("{}/query", self.base_url.trim_end_matches('/'));

        debug!("Querying lake for stream {}: {}", stream, expression);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/x-ndjson")
            .json(&ZedQueryRequest {
                query: expression,
                head: ZedQueryHead {
                    pool: stream,
                    branch: DEFAULT_BRANCH,
                },
            })
            .send()
            .await
            .map_err(|e| LakeError::Network(e.to_string()))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| LakeError::Network(e.to_string()))?;

        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| LakeError::Decode(format!("{}: {}", e, line)))
            })
            .collect()
    }

    fn backend(&self) -> &'static str {
        "zed"
    }
}
