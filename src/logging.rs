//! Subscriber setup for the binary.
//!
//! Library crates log through `log`; the `tracing-log` bridge picks those
//! records up so both end up in the same sinks.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Log level is set from, in order of preference: `-v`/`-vv`, `RUST_LOG`,
/// then info.
pub fn init(verbose: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("rustls=warn".parse()?)
        .add_directive("hyper=info".parse()?)
        .add_directive("hyper_util=info".parse()?);
    if verbose != 0 {
        env_filter = env_filter.add_directive(
            match verbose {
                1 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
            .into(),
        );
    }

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::Layer::default().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::Layer::default().compact().with_writer(std::io::stderr))
        .with(file_layer)
        .with(env_filter)
        .try_init()?;
    Ok(())
}
