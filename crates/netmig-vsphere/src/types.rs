//! Connection settings and the raw inventory shapes handed to collectors.
//!
//! The `*Source` types mirror what the management API exposes, before any
//! normalization: optional fields stay optional and VLAN settings stay
//! loosely typed. Collectors turn them into `netmig_core::types` records.

use netmig_core::vlan::VlanFields;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Connection / Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Top-level configuration for connecting to a vCenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereConfig {
    /// vCenter hostname / IP (e.g. "vcenter.lab.local")
    #[serde(default)]
    pub host: String,
    /// Port (default 443)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username (e.g. "administrator@vsphere.local")
    #[serde(default)]
    pub username: String,
    /// Password
    #[serde(default)]
    pub password: String,
    /// Skip TLS certificate verification (self-signed labs)
    #[serde(default)]
    pub insecure: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// VI/JSON API release segment of the base path
    #[serde(default = "default_api_release")]
    pub api_release: String,
}

fn default_port() -> u16 { 443 }
fn default_timeout() -> u64 { 30 }
fn default_api_release() -> String { "8.0.1.0".into() }

impl Default for VsphereConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            port: 443,
            insecure: false,
            timeout_secs: 30,
            api_release: default_api_release(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Managed object references
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `ManagedObjectReference` as encoded by the VI/JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObjectReference {
    #[serde(rename = "_typeName", default = "moref_type_name")]
    pub type_name: String,
    #[serde(rename = "type")]
    pub mo_type: String,
    pub value: String,
}

fn moref_type_name() -> String { "ManagedObjectReference".into() }

impl ManagedObjectReference {
    pub fn new(mo_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: moref_type_name(),
            mo_type: mo_type.into(),
            value: value.into(),
        }
    }

    /// `/{type}/{id}` path segment used by every property read and method call.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.mo_type, self.value)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Switch sources
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default)]
pub struct DistributedSwitchSource {
    /// Managed-object id (e.g. "dvs-21")
    pub id: String,
    pub name: String,
    pub uuid: String,
    pub version: Option<String>,
    pub vendor: Option<String>,
    pub build: Option<String>,
    pub max_mtu: Option<u32>,
    pub max_ports: Option<u32>,
    pub num_standalone_ports: Option<u32>,
    pub link_discovery_protocol: Option<String>,
    pub link_discovery_operation: Option<String>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    pub uplink_port_names: Vec<String>,
    /// Ids of the hosts attached to this switch
    pub member_host_ids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StandardSwitchSource {
    pub host_id: String,
    pub host_name: String,
    pub name: String,
    pub mtu: Option<u32>,
    pub num_ports: Option<u32>,
}

/// Switch whose port groups are being walked.
#[derive(Debug, Clone)]
pub enum SwitchSource {
    Distributed(DistributedSwitchSource),
    Standard(StandardSwitchSource),
}

impl SwitchSource {
    pub fn name(&self) -> &str {
        match self {
            Self::Distributed(s) => &s.name,
            Self::Standard(s) => &s.name,
        }
    }
}

/// Port group as exposed by either switch kind. Fields that only one kind
/// carries are `None` for the other.
#[derive(Debug, Clone, Default)]
pub struct PortGroupSource {
    pub key: Option<String>,
    pub name: String,
    pub num_ports: Option<u32>,
    /// `earlyBinding` / `lateBinding` / `ephemeral`
    pub binding: Option<String>,
    pub auto_expand: Option<bool>,
    pub vlan: VlanFields,
    pub active_nics: Option<Vec<String>>,
    pub standby_nics: Option<Vec<String>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Hosts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSource {
    /// Managed-object id (e.g. "host-10")
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct VmKernelAdapterSource {
    /// Device name (e.g. "vmk0")
    pub device: String,
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub dhcp: Option<bool>,
    pub mac: Option<String>,
    pub mtu: Option<u32>,
    pub switch_name: Option<String>,
    pub port_group: Option<String>,
    /// `HostVirtualNicManagerNicType` values the adapter is selected for
    pub nic_types: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Clusters / Resource pools
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSource {
    pub moref: ManagedObjectReference,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolParent {
    Cluster(String),
    ResourcePool(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationSource {
    pub shares_level: Option<String>,
    pub shares: Option<i32>,
    pub reservation: Option<i64>,
    pub limit: Option<i64>,
    pub expandable_reservation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePoolSource {
    pub moref: ManagedObjectReference,
    pub name: String,
    pub parent: PoolParent,
    pub cpu: AllocationSource,
    pub memory: AllocationSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadSource {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSource {
    pub principal: String,
    pub group: bool,
    pub role_id: i32,
    pub role_name: Option<String>,
    pub propagate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_yaml() {
        let cfg: VsphereConfig = serde_yaml::from_str("host: vc.lab.local\nusername: admin\n").unwrap();
        assert_eq!(cfg.port, 443);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.api_release, "8.0.1.0");
        assert!(!cfg.insecure);
        assert!(cfg.password.is_empty());
    }

    #[test]
    fn moref_wire_shape() {
        let moref = ManagedObjectReference::new("HostSystem", "host-10");
        let json = serde_json::to_value(&moref).unwrap();
        assert_eq!(json["_typeName"], "ManagedObjectReference");
        assert_eq!(json["type"], "HostSystem");
        assert_eq!(moref.path(), "/HostSystem/host-10");

        let back: ManagedObjectReference =
            serde_json::from_str(r#"{"type":"Folder","value":"group-d1"}"#).unwrap();
        assert_eq!(back.type_name, "ManagedObjectReference");
    }
}
