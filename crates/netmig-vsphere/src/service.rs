//! Export service: owns the session lifecycle around one collection run.
//!
//! `ExportService::run` connects, logs in, runs the requested collector
//! and logs out again on every path once the client exists.

use netmig_core::stats::RunStats;
use netmig_core::types::{ExportDocument, ExportRecord};

use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::host::HostNetworkCollector;
use crate::inventory::{InventorySession, VimInventory};
use crate::outcome::{Collected, CollectionWarning};
use crate::pool::ResourcePoolCollector;
use crate::switch::SwitchTopologyCollector;
use crate::types::VsphereConfig;
use crate::vsphere::VsphereClient;

/// What to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    Switches { include_standard: bool },
    Hosts,
    ResourcePools { cluster: String },
}

impl ExportRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Switches { .. } => "switch topology",
            Self::Hosts => "host network profiles",
            Self::ResourcePools { .. } => "resource pools",
        }
    }
}

/// Everything one run produced. `document` is always writable; it is
/// empty when `error` is set.
#[derive(Debug)]
pub struct ExportRun {
    pub document: ExportDocument,
    pub warnings: Vec<CollectionWarning>,
    pub stats: RunStats,
    pub error: Option<VmwareError>,
}

impl ExportRun {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ExportService {
    config: VsphereConfig,
    skip_server_check: bool,
}

impl ExportService {
    pub fn new(config: VsphereConfig) -> Self {
        Self { config, skip_server_check: false }
    }

    /// Accept endpoints that are not a vCenter (e.g. a standalone ESXi host).
    pub fn skip_server_check(mut self, skip: bool) -> Self {
        self.skip_server_check = skip;
        self
    }

    /// Connect, collect, disconnect. `Err` means no session could be
    /// established; collection failures come back inside [`ExportRun`].
    pub async fn run(&self, request: &ExportRequest) -> VmwareResult<ExportRun> {
        let client = VsphereClient::new(&self.config)?;
        self.run_on(client, request).await
    }

    async fn run_on(&self, mut client: VsphereClient, request: &ExportRequest) -> VmwareResult<ExportRun> {
        let result = self.run_with_client(&mut client, request).await;

        if client.is_connected() {
            match client.logout().await {
                Ok(()) => log::info!("Disconnected from {}", self.config.host),
                Err(e) => log::warn!("Logout from {} failed: {e}", self.config.host),
            }
        }
        result
    }

    async fn run_with_client(
        &self,
        client: &mut VsphereClient,
        request: &ExportRequest,
    ) -> VmwareResult<ExportRun> {
        let content = client.retrieve_service_content().await?;
        log::info!(
            "Endpoint {}: {} (API {})",
            self.config.host,
            content.about.full_name,
            content.about.api_version
        );
        if !self.skip_server_check && content.about.api_type != "VirtualCenter" {
            return Err(VmwareError::new(
                VmwareErrorKind::UnsupportedServer,
                format!(
                    "{} is a '{}' endpoint, not a vCenter Server",
                    self.config.host, content.about.api_type
                ),
            ));
        }

        client.login().await?;
        log::info!("Logged in to {} as {}", self.config.host, self.config.username);

        let inventory = VimInventory::new(client);
        Ok(collect(&inventory, request).await)
    }
}

/// Run one collector over an established session. A fatal collector
/// error yields an empty document with `error` set.
pub async fn collect(session: &dyn InventorySession, request: &ExportRequest) -> ExportRun {
    let mut stats = RunStats::new();
    log::info!("Collecting {}", request.label());

    let result: VmwareResult<Collected<ExportRecord>> = match request {
        ExportRequest::Switches { include_standard } => SwitchTopologyCollector::new(session)
            .collect(*include_standard)
            .await
            .map(|c| c.map(ExportRecord::from)),
        ExportRequest::Hosts => HostNetworkCollector::new(session)
            .collect()
            .await
            .map(|c| c.map(ExportRecord::from)),
        ExportRequest::ResourcePools { cluster } => ResourcePoolCollector::new(session)
            .collect(cluster)
            .await
            .map(|c| c.map(ExportRecord::from)),
    };

    match result {
        Ok(collected) => {
            stats.observe_all(&collected.records);
            stats.add_warnings(collected.warnings.len());
            ExportRun {
                document: collected.records,
                warnings: collected.warnings,
                stats,
                error: None,
            }
        }
        Err(e) => {
            log::error!("Collecting {} failed: {e}", request.label());
            ExportRun {
                document: ExportDocument::new(),
                warnings: Vec::new(),
                stats,
                error: Some(e),
            }
        }
    }
}
