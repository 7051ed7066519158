//! Portable configuration records.
//!
//! Everything here is plain data: built once by a collector, never mutated
//! after assembly, serialized, then dropped.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vlan::{VlanClassification, VlanRange};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Switches
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One virtual switch, tagged by `kind`.
///
/// A standard switch is host-local and always carries its host name; a
/// distributed switch spans many hosts and has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SwitchRecord {
    Distributed(DistributedSwitchRecord),
    Standard(StandardSwitchRecord),
}

impl SwitchRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Distributed(s) => &s.name,
            Self::Standard(s) => &s.name,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Distributed(_) => "Distributed",
            Self::Standard(_) => "Standard",
        }
    }

    /// Owning host; `None` for distributed switches.
    pub fn host_name(&self) -> Option<&str> {
        match self {
            Self::Distributed(_) => None,
            Self::Standard(s) => Some(&s.host_name),
        }
    }

    pub fn port_group_count(&self) -> usize {
        match self {
            Self::Distributed(s) => s.port_groups.len(),
            Self::Standard(s) => s.port_groups.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedSwitchRecord {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub build: String,
    pub mtu: u32,
    pub max_ports: u32,
    pub num_standalone_ports: u32,
    #[serde(default)]
    pub link_discovery_protocol: Option<String>,
    #[serde(default)]
    pub link_discovery_operation: Option<String>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub description: String,
    pub num_uplink_ports: u32,
    #[serde(default)]
    pub uplink_port_names: Vec<String>,
    #[serde(default)]
    pub port_groups: Vec<DistributedPortGroupRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSwitchRecord {
    pub name: String,
    pub host_name: String,
    pub mtu: u32,
    pub num_ports: u32,
    #[serde(default)]
    pub port_groups: Vec<StandardPortGroupRecord>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Port groups
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Port group on a distributed switch. `key` is unique within the owning
/// switch only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedPortGroupRecord {
    pub key: String,
    pub name: String,
    pub num_ports: u32,
    pub vlan: VlanClassification,
    /// Every range after the first one when the source exposes a trunk
    /// with several disjoint ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlan_trunk_ranges: Vec<VlanRange>,
    pub port_binding_mode: PortBindingMode,
    pub auto_expand: bool,
}

/// Port group on a host-local standard switch, with its NIC teaming order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardPortGroupRecord {
    pub name: String,
    pub num_ports: u32,
    pub vlan: VlanClassification,
    #[serde(default)]
    pub active_nics: Vec<String>,
    #[serde(default)]
    pub standby_nics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortBindingMode {
    Static,
    Dynamic,
    Ephemeral,
    #[serde(other)]
    Unknown,
}

impl PortBindingMode {
    /// Map the API's `DVPortgroupConfigInfo.type` value.
    pub fn from_api(value: &str) -> Self {
        match value {
            "earlyBinding" => Self::Static,
            "lateBinding" => Self::Dynamic,
            "ephemeral" => Self::Ephemeral,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Dynamic => "Dynamic",
            Self::Ephemeral => "Ephemeral",
            Self::Unknown => "Unknown",
        }
    }
}

impl Default for PortBindingMode {
    fn default() -> Self { Self::Unknown }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Host networking
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Management-plane traffic a VMkernel adapter may carry. Each one is
/// enabled independently, so adapters hold a set of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceFlag {
    VMotion,
    Management,
    FaultToleranceLogging,
    StorageTraffic,
}

impl ServiceFlag {
    /// Map a `HostVirtualNicManagerNicType` value. Types outside the four
    /// tracked services yield `None`.
    pub fn from_nic_type(nic_type: &str) -> Option<Self> {
        match nic_type {
            "vmotion" => Some(Self::VMotion),
            "management" => Some(Self::Management),
            "faultToleranceLogging" => Some(Self::FaultToleranceLogging),
            "vsan" => Some(Self::StorageTraffic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmKernelAdapterRecord {
    pub name: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub subnet_mask: String,
    #[serde(default)]
    pub dhcp: bool,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub v_switch_name: String,
    #[serde(default)]
    pub port_group_name: String,
    pub mtu: u32,
    pub service_flags: BTreeSet<ServiceFlag>,
}

/// One compute host's network view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNetworkProfile {
    pub host_name: String,
    pub switches: Vec<SwitchRecord>,
    pub vm_kernel_adapters: Vec<VmKernelAdapterRecord>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Resource pools
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentType {
    Cluster,
    ResourcePool,
}

impl ParentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "Cluster",
            Self::ResourcePool => "ResourcePool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharesLevel {
    Low,
    Normal,
    High,
    Custom,
}

impl SharesLevel {
    /// Map the API's `SharesLevel` value (`low`, `normal`, `high`, `custom`).
    pub fn from_api(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for SharesLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    pub principal: String,
    pub role: String,
    pub propagate: bool,
    #[serde(default)]
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePoolRecord {
    pub name: String,
    pub parent_type: ParentType,
    pub parent_name: String,
    pub cpu_shares_level: SharesLevel,
    pub cpu_shares: i32,
    #[serde(rename = "cpuReservationMHz")]
    pub cpu_reservation_mhz: i64,
    /// `-1` means unlimited.
    #[serde(rename = "cpuLimitMHz")]
    pub cpu_limit_mhz: i64,
    pub cpu_expandable_reservation: bool,
    pub mem_shares_level: SharesLevel,
    pub mem_shares: i32,
    #[serde(rename = "memReservationMB")]
    pub mem_reservation_mb: i64,
    #[serde(rename = "memLimitMB")]
    pub mem_limit_mb: i64,
    pub mem_expandable_reservation: bool,
    pub contained_workload_names: Vec<String>,
    pub permissions: Vec<PermissionRecord>,
    /// Set later by whoever plans the migration; collectors leave it false.
    #[serde(default)]
    pub selected_for_migration: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Aggregate document
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Element of an export document. Consumers must match on the variant
/// before touching kind-specific fields.
///
/// Top-level switches are tagged `DistributedSwitch` / `StandardSwitch`.
/// Switches nested in a host profile's `switches` array are [`SwitchRecord`]s
/// and carry that enum's own tags, `Distributed` / `Standard`; the fields
/// under either tag are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ExportRecord {
    DistributedSwitch(DistributedSwitchRecord),
    StandardSwitch(StandardSwitchRecord),
    HostNetworkProfile(HostNetworkProfile),
    ResourcePool(ResourcePoolRecord),
}

impl From<SwitchRecord> for ExportRecord {
    fn from(record: SwitchRecord) -> Self {
        match record {
            SwitchRecord::Distributed(s) => Self::DistributedSwitch(s),
            SwitchRecord::Standard(s) => Self::StandardSwitch(s),
        }
    }
}

impl From<HostNetworkProfile> for ExportRecord {
    fn from(profile: HostNetworkProfile) -> Self {
        Self::HostNetworkProfile(profile)
    }
}

impl From<ResourcePoolRecord> for ExportRecord {
    fn from(pool: ResourcePoolRecord) -> Self {
        Self::ResourcePool(pool)
    }
}

/// Ordered sequence of tagged records; serializes as a bare array.
pub type ExportDocument = Vec<ExportRecord>;
