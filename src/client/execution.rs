//! Execution client: `POST /api/run_code`, mapped into an [`ExecutionResult`].

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use super::{ServiceClient, ServiceError, RUN_PATH};
use crate::{
    model::{ExecutionResult, NO_OUTPUT},
    session::SessionId,
};

#[derive(Debug, Clone)]
pub struct ExecutionClient {
    service: ServiceClient,
    timeout: Duration,
}

impl ExecutionClient {
    pub fn new(service: ServiceClient, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Run `text` remotely. Always settles to a value; failures become
    /// [`ExecutionResult::Error`] carrying the server's message when it sent one.
    pub async fn run(&self, text: &str, session: &SessionId) -> ExecutionResult {
        let result = match self.service.post_code(RUN_PATH, session, text, Some(self.timeout)).await {
            Ok(body) => result_from_body(&body),
            Err(ServiceError::Malformed(detail)) => {
                ExecutionResult::Error(format!("malformed response from execution service: {}", detail))
            }
            Err(err) => ExecutionResult::Error(err.to_string()),
        };
        match &result {
            ExecutionResult::Output(out) => info!(session = %session, bytes = out.len(), "run finished"),
            ExecutionResult::Error(msg) => warn!(session = %session, error = %msg, "run failed"),
        }
        result
    }
}

/// Map a 2xx reply. A non-empty `error` field wins; otherwise `output`, with
/// an empty or absent output replaced by [`NO_OUTPUT`].
pub fn result_from_body(body: &Value) -> ExecutionResult {
    if !body.is_object() {
        return ExecutionResult::Error("malformed response from execution service".to_string());
    }
    if let Some(err) = body.get("error").and_then(|v| v.as_str()).filter(|s| !s.is_empty()) {
        return ExecutionResult::Error(err.to_string());
    }
    match body.get("output").and_then(|v| v.as_str()) {
        Some(out) if !out.is_empty() => ExecutionResult::Output(out.to_string()),
        _ => ExecutionResult::Output(NO_OUTPUT.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_is_kept_verbatim() {
        assert_eq!(
            result_from_body(&json!({ "output": "0\n1\n2\n" })),
            ExecutionResult::Output("0\n1\n2\n".into())
        );
    }

    #[test]
    fn test_empty_output_uses_sentinel() {
        assert_eq!(result_from_body(&json!({ "output": "" })), ExecutionResult::Output(NO_OUTPUT.into()));
        assert_eq!(result_from_body(&json!({})), ExecutionResult::Output(NO_OUTPUT.into()));
        assert_eq!(result_from_body(&json!({ "output": null })), ExecutionResult::Output(NO_OUTPUT.into()));
    }

    #[test]
    fn test_server_error_field_wins() {
        assert_eq!(
            result_from_body(&json!({ "error": "timed out after 5 seconds", "output": "partial" })),
            ExecutionResult::Error("timed out after 5 seconds".into())
        );
        // An empty error field is not an error.
        assert_eq!(
            result_from_body(&json!({ "error": "", "output": "ok" })),
            ExecutionResult::Output("ok".into())
        );
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(result_from_body(&json!(["x"])).is_error());
        assert!(result_from_body(&json!("text")).is_error());
    }
}
