//! `--check`: lint a file once and print the findings.

use std::path::Path;

use anyhow::{bail, Result};

use crate::{
    client::{AnalysisClient, ServiceClient},
    config::Config,
    printer::FindingsPrinter,
    session::SessionId,
};

pub async fn run(cfg: &Config, file: &Path, color: bool) -> Result<()> {
    let code = super::read_source(file)?;
    let service = ServiceClient::from_config(cfg)?;
    let client = AnalysisClient::new(service.clone());
    let session = SessionId::generate();

    let findings = client.check(&code, &session).await;
    super::release(&service, &session).await;

    match findings {
        Some(findings) => {
            FindingsPrinter { color }.print(&findings);
            Ok(())
        }
        None => bail!("lint service at {} is unavailable", service.base()),
    }
}
