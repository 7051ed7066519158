//! # netmig – vSphere configuration export
//!
//! Connects to a vCenter, collects one kind of configuration (switch
//! topology, host network profiles or resource pools) and writes it as a
//! JSON or CSV document for replay on another platform.
//!
//! ## Modules
//!
//! - **cli** — clap arguments and config-file merge
//! - **logging** — tracing subscriber setup

pub mod cli;
pub mod logging;

use anyhow::Context;
use netmig_core::document::{write_document, OutputFormat};
use netmig_vsphere::service::ExportService;
use tracing::{info, warn};

use crate::cli::Cli;

/// One export run. Once a session is up the output file is always written,
/// empty if collection failed, and the failure is returned afterwards.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.vsphere_config()?;
    let request = cli.command.request();
    let format = OutputFormat::from(cli.format);

    info!("Exporting {} from {}", request.label(), config.host);
    let host = config.host.clone();
    let run = ExportService::new(config)
        .skip_server_check(cli.skip_server_check)
        .run(&request)
        .await
        .with_context(|| format!("could not establish a session with {host}"))?;

    write_document(&cli.output, format, &run.document)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    if !run.warnings.is_empty() {
        warn!("{} item(s) could not be collected; see warnings above", run.warnings.len());
    }
    info!("{}", run.stats.summary_line());

    match run.error {
        Some(e) => Err(anyhow::Error::new(e).context(format!("collecting {} failed", request.label()))),
        None => Ok(()),
    }
}
