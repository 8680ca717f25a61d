//! `--run`: execute a file once and print its output.

use std::path::Path;

use anyhow::{bail, Result};

use crate::{
    client::{ExecutionClient, ServiceClient},
    config::Config,
    model::ExecutionResult,
    printer::OutputPrinter,
    session::SessionId,
};

pub async fn run(cfg: &Config, file: &Path, color: bool) -> Result<()> {
    let code = super::read_source(file)?;
    let service = ServiceClient::from_config(cfg)?;
    let client = ExecutionClient::new(service.clone(), cfg.run_timeout());
    let session = SessionId::generate();

    let result = client.run(&code, &session).await;
    super::release(&service, &session).await;

    OutputPrinter { color }.print(&result);
    if let ExecutionResult::Error(_) = result {
        bail!("run failed");
    }
    Ok(())
}
