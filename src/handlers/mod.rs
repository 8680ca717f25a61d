//! One-shot (non-interactive) modes.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::{client::ServiceClient, session::SessionId};

pub mod check;
pub mod run;

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Release the one-shot session. Failures are logged only.
pub(crate) async fn release(service: &ServiceClient, session: &SessionId) {
    if let Err(err) = service.cleanup(session).await {
        warn!(session = %session, error = %err, "session cleanup failed");
    }
}
