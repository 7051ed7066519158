//! VI/JSON wire types.
//!
//! Only the properties the collectors read are modelled; everything else
//! in a payload is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ManagedObjectReference;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Service instance
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContent {
    pub root_folder: ManagedObjectReference,
    pub session_manager: ManagedObjectReference,
    pub view_manager: ManagedObjectReference,
    #[serde(default)]
    pub authorization_manager: Option<ManagedObjectReference>,
    #[serde(default)]
    pub about: AboutInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub build: String,
    /// "VirtualCenter" or "HostAgent"
    #[serde(default)]
    pub api_type: String,
    #[serde(default)]
    pub api_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContainerViewBody<'a> {
    pub container: &'a ManagedObjectReference,
    #[serde(rename = "type")]
    pub types: Vec<&'a str>,
    pub recursive: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Distributed switches
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub product_info: Option<DvsProductSpec>,
    #[serde(default)]
    pub host_member: Vec<ManagedObjectReference>,
    #[serde(default)]
    pub contact: Option<DvsContactInfo>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsProductSpec {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsConfigInfo {
    #[serde(default)]
    pub max_ports: Option<u32>,
    #[serde(default)]
    pub num_standalone_ports: Option<u32>,
    #[serde(default)]
    pub max_mtu: Option<u32>,
    #[serde(default)]
    pub uplink_port_policy: Option<UplinkPortPolicy>,
    #[serde(default)]
    pub link_discovery_protocol_config: Option<LinkDiscoveryProtocolConfig>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact: Option<DvsContactInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkPortPolicy {
    #[serde(default)]
    pub uplink_port_name: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDiscoveryProtocolConfig {
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvPortgroupConfigInfo {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub num_ports: Option<u32>,
    /// `earlyBinding` / `lateBinding` / `ephemeral`
    #[serde(default, rename = "type")]
    pub binding_type: Option<String>,
    #[serde(default)]
    pub auto_expand: Option<bool>,
    #[serde(default)]
    pub uplink: Option<bool>,
    #[serde(default)]
    pub default_port_config: Option<DvsPortSetting>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsPortSetting {
    /// One of the `VmwareDistributedVirtualSwitch*VlanSpec` types, told apart
    /// by `_typeName`.
    #[serde(default)]
    pub vlan: Option<Value>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Host networking
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfigInfo {
    #[serde(default)]
    pub network: Option<HostNetworkInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNetworkInfo {
    #[serde(default)]
    pub vswitch: Vec<HostVirtualSwitch>,
    #[serde(default)]
    pub portgroup: Vec<HostPortGroup>,
    #[serde(default)]
    pub vnic: Vec<HostVirtualNic>,
    #[serde(default)]
    pub proxy_switch: Vec<HostProxySwitch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVirtualSwitch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub num_ports: Option<u32>,
    #[serde(default)]
    pub mtu: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPortGroup {
    #[serde(default)]
    pub key: Option<String>,
    /// Ports currently in use
    #[serde(default)]
    pub port: Vec<Value>,
    #[serde(default)]
    pub spec: HostPortGroupSpec,
    #[serde(default)]
    pub computed_policy: Option<HostNetworkPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPortGroupSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vlan_id: Option<Value>,
    #[serde(default)]
    pub vswitch_name: String,
    #[serde(default)]
    pub policy: Option<HostNetworkPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNetworkPolicy {
    #[serde(default)]
    pub nic_teaming: Option<HostNicTeamingPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNicTeamingPolicy {
    #[serde(default)]
    pub nic_order: Option<HostNicOrderPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNicOrderPolicy {
    #[serde(default)]
    pub active_nic: Vec<String>,
    #[serde(default)]
    pub standby_nic: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVirtualNic {
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub key: String,
    /// Standard port-group name; empty for distributed ports
    #[serde(default)]
    pub portgroup: Option<String>,
    #[serde(default)]
    pub spec: HostVirtualNicSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVirtualNicSpec {
    #[serde(default)]
    pub ip: Option<HostIpConfig>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub distributed_virtual_port: Option<DvsPortConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostIpConfig {
    #[serde(default)]
    pub dhcp: Option<bool>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub subnet_mask: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvsPortConnection {
    #[serde(default)]
    pub switch_uuid: String,
    #[serde(default)]
    pub portgroup_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostProxySwitch {
    #[serde(default)]
    pub dvs_uuid: String,
    #[serde(default)]
    pub dvs_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfigManager {
    #[serde(default)]
    pub virtual_nic_manager: Option<ManagedObjectReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVirtualNicManagerInfo {
    #[serde(default)]
    pub net_config: Vec<VirtualNicManagerNetConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNicManagerNetConfig {
    #[serde(default)]
    pub nic_type: String,
    /// Entries look like `VirtualNicManagerNetConfig.vmotion.key-vim.host.VirtualNic-vmk1`
    #[serde(default)]
    pub selected_vnic: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Resource pools / permissions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfigSpec {
    #[serde(default)]
    pub cpu_allocation: ResourceAllocationInfo,
    #[serde(default)]
    pub memory_allocation: ResourceAllocationInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocationInfo {
    #[serde(default)]
    pub reservation: Option<i64>,
    #[serde(default)]
    pub expandable_reservation: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub shares: Option<SharesInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharesInfo {
    #[serde(default)]
    pub shares: Option<i32>,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveEntityPermissionsBody<'a> {
    pub entity: &'a ManagedObjectReference,
    pub inherited: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub principal: String,
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub role_id: i32,
    #[serde(default)]
    pub propagate: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRole {
    #[serde(default)]
    pub role_id: i32,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_network_payload() {
        let payload = json!({
            "_typeName": "HostConfigInfo",
            "network": {
                "vswitch": [{ "name": "vSwitch0", "numPorts": 128, "mtu": 1500, "key": "key-vim.host.VirtualSwitch-vSwitch0" }],
                "portgroup": [{
                    "key": "key-vim.host.PortGroup-VM Network",
                    "port": [],
                    "spec": { "name": "VM Network", "vlanId": 0, "vswitchName": "vSwitch0", "policy": {} },
                    "computedPolicy": { "nicTeaming": { "nicOrder": { "activeNic": ["vmnic0"], "standbyNic": ["vmnic1"] } } }
                }],
                "vnic": [{
                    "device": "vmk0",
                    "key": "key-vim.host.VirtualNic-vmk0",
                    "portgroup": "Management Network",
                    "spec": { "ip": { "dhcp": false, "ipAddress": "10.0.0.11", "subnetMask": "255.255.255.0" }, "mac": "00:50:56:aa:bb:cc", "mtu": 1500 }
                }],
                "proxySwitch": [{ "dvsUuid": "50 1a", "dvsName": "DVS-Prod" }]
            }
        });
        let cfg: HostConfigInfo = serde_json::from_value(payload).unwrap();
        let net = cfg.network.unwrap();
        assert_eq!(net.vswitch[0].num_ports, Some(128));
        let order = net.portgroup[0]
            .computed_policy.as_ref().unwrap()
            .nic_teaming.as_ref().unwrap()
            .nic_order.as_ref().unwrap();
        assert_eq!(order.active_nic, vec!["vmnic0"]);
        assert_eq!(net.vnic[0].spec.ip.as_ref().unwrap().ip_address.as_deref(), Some("10.0.0.11"));
        assert_eq!(net.proxy_switch[0].dvs_name, "DVS-Prod");
    }

    #[test]
    fn portgroup_config_payload() {
        let payload = json!({
            "key": "dvportgroup-31",
            "name": "Web",
            "numPorts": 16,
            "type": "earlyBinding",
            "autoExpand": true,
            "uplink": false,
            "defaultPortConfig": {
                "vlan": { "_typeName": "VmwareDistributedVirtualSwitchVlanIdSpec", "inherited": false, "vlanId": 100 }
            }
        });
        let cfg: DvPortgroupConfigInfo = serde_json::from_value(payload).unwrap();
        assert_eq!(cfg.binding_type.as_deref(), Some("earlyBinding"));
        assert_eq!(cfg.default_port_config.unwrap().vlan.unwrap()["vlanId"], 100);
    }
}
