//! Reqwest-based clients for the remote lint/execution service.
//!
//! Every request carries the session id in the `X-Session-ID` header so the
//! service can scope per-user state (temp files, interpreter processes) and
//! reclaim it on `/api/cleanup`.

use std::time::Duration;

use anyhow::Result;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{config::Config, session::SessionId};

pub mod analysis;
pub mod execution;

pub use analysis::AnalysisClient;
pub use execution::ExecutionClient;

pub const SESSION_HEADER: &str = "X-Session-ID";

pub const CHECK_PATH: &str = "/api/check_code";
pub const RUN_PATH: &str = "/api/run_code";
pub const CLEANUP_PATH: &str = "/api/cleanup";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{}", describe_transport(.0))]
    Transport(#[from] reqwest::Error),
    /// Non-2xx reply; `error` is the structured `error` field of the body, if any.
    #[error("{}", describe_status(.status, .error))]
    Status { status: StatusCode, error: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
}

fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect to service: {}", err)
    } else {
        err.to_string()
    }
}

fn describe_status(status: &StatusCode, error: &Option<String>) -> String {
    match error {
        Some(msg) => msg.clone(),
        None => format!("request failed with status {}", status),
    }
}

/// Shared HTTP transport: base URL, timeouts and the session header.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base: String,
}

impl ServiceClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.api_base(), cfg.request_timeout())
    }

    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base: base.trim_end_matches('/').to_string() })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn post(&self, path: &str, session: &SessionId) -> RequestBuilder {
        let url = format!("{}{}", self.base, path);
        self.http.post(url).header(SESSION_HEADER, session.as_str())
    }

    /// POST `{ "code": code }` and return the parsed JSON body of a 2xx reply.
    pub async fn post_code(
        &self,
        path: &str,
        session: &SessionId,
        code: &str,
        timeout: Option<Duration>,
    ) -> Result<Value, ServiceError> {
        let mut req = self.post(path, session).json(&serde_json::json!({ "code": code }));
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(%path, %status, bytes = text.len(), "service replied");

        if !status.is_success() {
            return Err(ServiceError::Status { status, error: error_field(&text) });
        }
        serde_json::from_str::<Value>(&text).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    /// Ask the service to release everything held for `session`. The reply body is ignored.
    pub async fn cleanup(&self, session: &SessionId) -> Result<(), ServiceError> {
        let resp = self.post(CLEANUP_PATH, session).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(ServiceError::Status { status, error: error_field(&text) })
        }
    }
}

/// Non-empty string `error` field of a JSON object body.
pub(crate) fn error_field(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
