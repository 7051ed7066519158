//! Command-line surface and connection-settings merge.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use netmig_core::document::OutputFormat;
use netmig_vsphere::service::ExportRequest;
use netmig_vsphere::types::VsphereConfig;

#[derive(Debug, Parser)]
#[command(name = "netmig", version, about = "Export vSphere switch, host-network and resource-pool configuration")]
pub struct Cli {
    /// YAML file with connection settings; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// vCenter host name or address
    #[arg(long, short = 's')]
    pub server: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, short = 'u')]
    pub user: Option<String>,

    #[arg(long, env = "NETMIG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept self-signed certificates
    #[arg(long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// VI/JSON API release in the request path (e.g. 8.0.1.0)
    #[arg(long, value_name = "VER")]
    pub api_release: Option<String>,

    /// Do not insist on a vCenter endpoint
    #[arg(long)]
    pub skip_server_check: bool,

    /// Document to write
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    #[arg(long, short = 'f', value_enum, default_value_t = Format::Structured)]
    pub format: Format,

    /// Also write the log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Distributed switches, optionally followed by every host's standard switches
    Switches {
        #[arg(long)]
        include_standard: bool,
    },
    /// One network profile per host
    Hosts,
    /// User-defined resource pools of one cluster
    Pools {
        #[arg(long)]
        cluster: String,
    },
}

impl Command {
    pub fn request(&self) -> ExportRequest {
        match self {
            Self::Switches { include_standard } => ExportRequest::Switches { include_standard: *include_standard },
            Self::Hosts => ExportRequest::Hosts,
            Self::Pools { cluster } => ExportRequest::ResourcePools { cluster: cluster.clone() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// JSON, full fidelity
    Structured,
    /// CSV, one row per switch and port group
    Tabular,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Structured => OutputFormat::Structured,
            Format::Tabular => OutputFormat::Tabular,
        }
    }
}

impl Cli {
    /// Connection settings: config file first, then flags on top.
    pub fn vsphere_config(&self) -> anyhow::Result<VsphereConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => VsphereConfig::default(),
        };

        if let Some(server) = &self.server {
            config.host = server.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = &self.user {
            config.username = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if self.insecure {
            config.insecure = true;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(release) = &self.api_release {
            config.api_release = release.clone();
        }

        ensure!(!config.host.trim().is_empty(), "no vCenter server given (--server or `host` in the config file)");
        ensure!(!config.username.is_empty(), "no user name given (--user or `username` in the config file)");
        ensure!(
            !config.password.is_empty(),
            "no password given (--password, NETMIG_PASSWORD or `password` in the config file)"
        );
        Ok(config)
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<VsphereConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}
