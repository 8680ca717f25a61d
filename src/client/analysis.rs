//! Lint client: `POST /api/check_code`, mapped into [`Finding`]s.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ServiceClient, ServiceError, CHECK_PATH};
use crate::{model::Finding, session::SessionId};

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    service: ServiceClient,
}

impl AnalysisClient {
    pub fn new(service: ServiceClient) -> Self {
        Self { service }
    }

    /// Lint `text`. A reply that is not a findings array (including one that
    /// is not JSON at all) means no findings. Returns `None` only when the
    /// service could not be reached or answered with a failure status; the
    /// caller then keeps whatever findings it already shows.
    pub async fn check(&self, text: &str, session: &SessionId) -> Option<Vec<Finding>> {
        match self.service.post_code(CHECK_PATH, session, text, None).await {
            Ok(body) => Some(findings_from_body(body)),
            Err(ServiceError::Malformed(detail)) => {
                debug!(session = %session, %detail, "lint reply is not JSON; treating as no findings");
                Some(Vec::new())
            }
            Err(err) => {
                warn!(session = %session, error = %err, "lint request failed; keeping previous findings");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireFinding {
    #[serde(default, deserialize_with = "line_number")]
    line: Option<u32>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error_info: Option<String>,
}

impl From<WireFinding> for Finding {
    fn from(w: WireFinding) -> Self {
        Finding {
            line: w.line,
            message: w.error.unwrap_or_default(),
            tip: w.message.unwrap_or_default(),
            code: w.code.filter(|c| !c.is_empty()),
            detail: w.error_info.unwrap_or_default(),
        }
    }
}

// The service sends line numbers as strings ("5"); accept either form.
fn line_number<'de, D>(de: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

/// Normalize a lint reply. A body that is not an array means "no issues";
/// `null` or otherwise unusable entries are skipped.
pub fn findings_from_body(body: Value) -> Vec<Finding> {
    let Value::Array(items) = body else {
        debug!("lint reply is not an array; treating as no findings");
        return Vec::new();
    };

    items
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| match serde_json::from_value::<WireFinding>(item) {
            Ok(w) => Some(Finding::from(w)),
            Err(e) => {
                debug!(error = %e, "skipping unreadable finding");
                None
            }
        })
        .collect()
}
