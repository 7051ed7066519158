//! Inventory access: the capability set collectors rely on, and its
//! implementation over the VI/JSON API.

use std::collections::{HashMap, VecDeque};
use std::future::Future;

use async_trait::async_trait;
use netmig_core::vlan::VlanFields;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{VmwareError, VmwareResult};
use crate::types::*;
use crate::vim::*;
use crate::vsphere::VsphereClient;

/// Read-only view of one management domain, reached through an
/// established session. Every call is a blocking round trip from the
/// collector's point of view; collectors await them one at a time.
#[async_trait]
pub trait InventorySession: Send + Sync {
    /// All distributed switches in the domain.
    async fn list_distributed_switches(&self) -> VmwareResult<Vec<DistributedSwitchSource>>;

    /// Port groups of one switch, distributed or standard.
    async fn list_port_groups(&self, switch: &SwitchSource) -> VmwareResult<Vec<PortGroupSource>>;

    /// All compute hosts.
    async fn list_hosts(&self) -> VmwareResult<Vec<HostSource>>;

    /// Standard switches owned by one host. May be empty.
    async fn list_standard_switches(&self, host: &HostSource) -> VmwareResult<Vec<StandardSwitchSource>>;

    /// VMkernel adapters of one host.
    async fn list_vmkernel_adapters(&self, host: &HostSource) -> VmwareResult<Vec<VmKernelAdapterSource>>;

    /// Cluster by exact name; `Ok(None)` when nothing matches.
    async fn resolve_cluster(&self, name: &str) -> VmwareResult<Option<ClusterSource>>;

    /// Every resource pool under the cluster, root pool included, parents
    /// before children.
    async fn list_resource_pools(&self, cluster: &ClusterSource) -> VmwareResult<Vec<ResourcePoolSource>>;

    /// Workloads (virtual machines) directly inside one pool.
    async fn list_workloads(&self, pool: &ResourcePoolSource) -> VmwareResult<Vec<WorkloadSource>>;

    /// Permissions defined directly on an entity (inherited ones excluded).
    async fn list_permissions(&self, entity: &ManagedObjectReference) -> VmwareResult<Vec<PermissionSource>>;
}

/// [`InventorySession`] backed by a logged-in [`VsphereClient`].
pub struct VimInventory<'a> {
    client: &'a VsphereClient,
    roles: OnceCell<HashMap<i32, String>>,
}

impl<'a> VimInventory<'a> {
    pub fn new(client: &'a VsphereClient) -> Self {
        Self { client, roles: OnceCell::new() }
    }

    // ── Helpers ─────────────────────────────────────────────────────

    /// Morefs of every object of `mo_type` below the root folder.
    async fn objects_of_type(&self, mo_type: &str) -> VmwareResult<Vec<ManagedObjectReference>> {
        let content = self.client.content()?;
        let body = CreateContainerViewBody {
            container: &content.root_folder,
            types: vec![mo_type],
            recursive: true,
        };
        let view: ManagedObjectReference = self
            .client
            .invoke(&content.view_manager, "CreateContainerView", &body)
            .await?;

        let members = self.list_property::<ManagedObjectReference>(&view, "view").await;

        if let Err(e) = self.client.invoke_void(&view, "DestroyView").await {
            log::debug!("DestroyView on {} failed: {e}", view.value);
        }
        members
    }

    /// Array-valued property; an unset property reads as empty.
    async fn list_property<T: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        property: &str,
    ) -> VmwareResult<Vec<T>> {
        Ok(self
            .client
            .get_property::<Option<Vec<T>>>(moref, property)
            .await?
            .unwrap_or_default())
    }

    async fn name_of(&self, moref: &ManagedObjectReference) -> VmwareResult<String> {
        self.client.get_property::<String>(moref, "name").await
    }

    async fn host_network(&self, host_id: &str) -> VmwareResult<HostNetworkInfo> {
        let moref = ManagedObjectReference::new("HostSystem", host_id);
        let config: Option<HostConfigInfo> = self.client.get_property(&moref, "config").await?;
        Ok(config.and_then(|c| c.network).unwrap_or_default())
    }

    async fn role_names(&self) -> VmwareResult<&HashMap<i32, String>> {
        self.roles
            .get_or_try_init(|| async {
                let auth = self.authorization_manager()?;
                let roles = self.list_property::<AuthorizationRole>(auth, "roleList").await?;
                Ok::<_, VmwareError>(roles.into_iter().map(|r| (r.role_id, r.name)).collect())
            })
            .await
    }

    fn authorization_manager(&self) -> VmwareResult<&ManagedObjectReference> {
        self.client
            .content()?
            .authorization_manager
            .as_ref()
            .ok_or_else(|| VmwareError::not_found("Endpoint exposes no AuthorizationManager"))
    }

    async fn pool_node(&self, moref: &ManagedObjectReference) -> VmwareResult<PoolNode> {
        let name = self.name_of(moref).await?;
        let config = self
            .client
            .get_property::<Option<ResourceConfigSpec>>(moref, "config")
            .await?
            .unwrap_or_default();
        let children = self.list_property::<ManagedObjectReference>(moref, "resourcePool").await?;
        Ok(PoolNode { name, config, children })
    }

    /// Distributed port-group name for a VMkernel NIC on a distributed port;
    /// falls back to the key when the lookup fails.
    async fn distributed_portgroup_name(&self, key: &str) -> String {
        let moref = ManagedObjectReference::new("DistributedVirtualPortgroup", key);
        match self.name_of(&moref).await {
            Ok(name) => name,
            Err(e) => {
                log::debug!("could not resolve port group {key}: {e}");
                key.to_string()
            }
        }
    }
}

/// Split a distributed port setting's polymorphic VLAN spec into the
/// candidate fields the classification policy understands.
pub(crate) fn dvs_vlan_fields(spec: Option<&Value>) -> VlanFields {
    let Some(spec) = spec else {
        return VlanFields::default();
    };
    let type_name = spec.get("_typeName").and_then(Value::as_str).unwrap_or_default();
    if type_name.ends_with("PvlanSpec") {
        VlanFields { pvlan_id: spec.get("pvlanId").cloned(), ..VlanFields::default() }
    } else if type_name.ends_with("TrunkVlanSpec") {
        VlanFields { vlan_range: spec.get("vlanId").cloned(), ..VlanFields::default() }
    } else {
        VlanFields { vlan_id: spec.get("vlanId").cloned(), ..VlanFields::default() }
    }
}

fn nic_order(policy: Option<&HostNetworkPolicy>) -> Option<&HostNicOrderPolicy> {
    policy
        .and_then(|p| p.nic_teaming.as_ref())
        .and_then(|t| t.nic_order.as_ref())
}

/// Effective teaming order: the computed policy, else the port group's own.
fn teaming_order(pg: &HostPortGroup) -> Option<&HostNicOrderPolicy> {
    nic_order(pg.computed_policy.as_ref()).or_else(|| nic_order(pg.spec.policy.as_ref()))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

#[async_trait]
impl InventorySession for VimInventory<'_> {
    async fn list_distributed_switches(&self) -> VmwareResult<Vec<DistributedSwitchSource>> {
        let mut out = Vec::new();
        for moref in self.objects_of_type("DistributedVirtualSwitch").await? {
            let summary: DvsSummary = self
                .client
                .get_property::<Option<DvsSummary>>(&moref, "summary")
                .await?
                .unwrap_or_default();
            let config: DvsConfigInfo = self
                .client
                .get_property::<Option<DvsConfigInfo>>(&moref, "config")
                .await?
                .unwrap_or_default();

            let product = summary.product_info.unwrap_or_default();
            let contact = config.contact.or(summary.contact).unwrap_or_default();
            let ldp = config.link_discovery_protocol_config.unwrap_or_default();

            log::debug!("distributed switch {} ({})", summary.name, moref.value);
            out.push(DistributedSwitchSource {
                id: moref.value.clone(),
                name: summary.name,
                uuid: summary.uuid,
                version: product.version,
                vendor: product.vendor,
                build: product.build,
                max_mtu: config.max_mtu,
                max_ports: config.max_ports,
                num_standalone_ports: config.num_standalone_ports,
                link_discovery_protocol: ldp.protocol,
                link_discovery_operation: ldp.operation,
                contact_name: non_empty(contact.name),
                contact_info: non_empty(contact.contact),
                description: non_empty(config.description.or(summary.description)),
                uplink_port_names: config
                    .uplink_port_policy
                    .map(|p| p.uplink_port_name)
                    .unwrap_or_default(),
                member_host_ids: summary.host_member.into_iter().map(|h| h.value).collect(),
            });
        }
        Ok(out)
    }

    async fn list_port_groups(&self, switch: &SwitchSource) -> VmwareResult<Vec<PortGroupSource>> {
        match switch {
            SwitchSource::Distributed(dvs) => {
                let moref = ManagedObjectReference::new("DistributedVirtualSwitch", &dvs.id);
                let mut out = Vec::new();
                for pg in self.list_property::<ManagedObjectReference>(&moref, "portgroup").await? {
                    let config: DvPortgroupConfigInfo = self
                        .client
                        .get_property::<Option<DvPortgroupConfigInfo>>(&pg, "config")
                        .await?
                        .unwrap_or_default();
                    if config.uplink.unwrap_or(false) {
                        continue;
                    }
                    let vlan_spec = config.default_port_config.as_ref().and_then(|c| c.vlan.as_ref());
                    out.push(PortGroupSource {
                        key: Some(if config.key.is_empty() { pg.value.clone() } else { config.key.clone() }),
                        name: config.name.clone(),
                        num_ports: config.num_ports,
                        binding: config.binding_type.clone(),
                        auto_expand: config.auto_expand,
                        vlan: dvs_vlan_fields(vlan_spec),
                        active_nics: None,
                        standby_nics: None,
                    });
                }
                Ok(out)
            }
            SwitchSource::Standard(vss) => {
                let network = self.host_network(&vss.host_id).await?;
                Ok(network
                    .portgroup
                    .iter()
                    .filter(|pg| pg.spec.vswitch_name == vss.name)
                    .map(|pg| {
                        let order = teaming_order(pg);
                        PortGroupSource {
                            key: None,
                            name: pg.spec.name.clone(),
                            num_ports: Some(pg.port.len() as u32),
                            binding: None,
                            auto_expand: None,
                            vlan: VlanFields {
                                vlan_id: pg.spec.vlan_id.clone(),
                                ..VlanFields::default()
                            },
                            active_nics: order.map(|o| o.active_nic.clone()),
                            standby_nics: order.map(|o| o.standby_nic.clone()),
                        }
                    })
                    .collect())
            }
        }
    }

    async fn list_hosts(&self) -> VmwareResult<Vec<HostSource>> {
        let mut out = Vec::new();
        for moref in self.objects_of_type("HostSystem").await? {
            let name = self.name_of(&moref).await?;
            out.push(HostSource { id: moref.value, name });
        }
        Ok(out)
    }

    async fn list_standard_switches(&self, host: &HostSource) -> VmwareResult<Vec<StandardSwitchSource>> {
        let network = self.host_network(&host.id).await?;
        Ok(network
            .vswitch
            .into_iter()
            .map(|vs| StandardSwitchSource {
                host_id: host.id.clone(),
                host_name: host.name.clone(),
                name: vs.name,
                mtu: vs.mtu,
                num_ports: vs.num_ports,
            })
            .collect())
    }

    async fn list_vmkernel_adapters(&self, host: &HostSource) -> VmwareResult<Vec<VmKernelAdapterSource>> {
        let network = self.host_network(&host.id).await?;

        let host_ref = ManagedObjectReference::new("HostSystem", &host.id);
        let manager = self
            .client
            .get_property::<Option<HostConfigManager>>(&host_ref, "configManager")
            .await?
            .and_then(|m| m.virtual_nic_manager);
        let net_config = match manager {
            Some(m) => self
                .client
                .get_property::<Option<HostVirtualNicManagerInfo>>(&m, "info")
                .await?
                .map(|i| i.net_config)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let dvs_names: HashMap<&str, &str> = network
            .proxy_switch
            .iter()
            .map(|p| (p.dvs_uuid.as_str(), p.dvs_name.as_str()))
            .collect();

        let mut out = Vec::new();
        for vnic in &network.vnic {
            let (switch_name, port_group) = match &vnic.spec.distributed_virtual_port {
                Some(dvp) => {
                    let pg = match &dvp.portgroup_key {
                        Some(key) => Some(self.distributed_portgroup_name(key).await),
                        None => None,
                    };
                    (dvs_names.get(dvp.switch_uuid.as_str()).map(|s| s.to_string()), pg)
                }
                None => {
                    let pg = non_empty(vnic.portgroup.clone());
                    let switch = pg.as_deref().and_then(|name| {
                        network
                            .portgroup
                            .iter()
                            .find(|p| p.spec.name == name)
                            .map(|p| p.spec.vswitch_name.clone())
                    });
                    (switch, pg)
                }
            };

            let nic_types = nic_types_for(&vnic.key, &net_config);
            let ip = vnic.spec.ip.clone().unwrap_or_default();
            out.push(VmKernelAdapterSource {
                device: vnic.device.clone(),
                ip_address: ip.ip_address,
                subnet_mask: ip.subnet_mask,
                dhcp: ip.dhcp,
                mac: vnic.spec.mac.clone(),
                mtu: vnic.spec.mtu,
                switch_name,
                port_group,
                nic_types,
            });
        }
        Ok(out)
    }

    async fn resolve_cluster(&self, name: &str) -> VmwareResult<Option<ClusterSource>> {
        let mut matches = Vec::new();
        for moref in self.objects_of_type("ClusterComputeResource").await? {
            if self.name_of(&moref).await? == name {
                matches.push(moref);
            }
        }
        single_cluster(name, matches)
    }

    async fn list_resource_pools(&self, cluster: &ClusterSource) -> VmwareResult<Vec<ResourcePoolSource>> {
        let root: ManagedObjectReference = self
            .client
            .get_property(&cluster.moref, "resourcePool")
            .await?;
        walk_pools(root, &cluster.name, |moref| async move { self.pool_node(&moref).await }).await
    }

    async fn list_workloads(&self, pool: &ResourcePoolSource) -> VmwareResult<Vec<WorkloadSource>> {
        let mut out = Vec::new();
        for vm in self.list_property::<ManagedObjectReference>(&pool.moref, "vm").await? {
            let name = self.name_of(&vm).await?;
            out.push(WorkloadSource { id: vm.value, name });
        }
        Ok(out)
    }

    async fn list_permissions(&self, entity: &ManagedObjectReference) -> VmwareResult<Vec<PermissionSource>> {
        let auth = self.authorization_manager()?;
        let body = RetrieveEntityPermissionsBody { entity, inherited: false };
        let perms: Vec<Permission> = self
            .client
            .invoke::<_, Option<Vec<Permission>>>(auth, "RetrieveEntityPermissions", &body)
            .await?
            .unwrap_or_default();
        let roles = self.role_names().await?;

        Ok(perms
            .into_iter()
            .map(|p| PermissionSource {
                role_name: roles.get(&p.role_id).cloned(),
                principal: p.principal,
                group: p.group,
                role_id: p.role_id,
                propagate: p.propagate,
            })
            .collect())
    }
}

/// The single cluster among those whose name matched `name`.
pub(crate) fn single_cluster(
    name: &str,
    mut matches: Vec<ManagedObjectReference>,
) -> VmwareResult<Option<ClusterSource>> {
    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop().map(|moref| ClusterSource { moref, name: name.to_string() })),
        n => Err(VmwareError::ambiguous_cluster(name, n)),
    }
}

/// Service types whose selection lists the VMkernel NIC `key`. An entry
/// selects the NIC when it is the key itself or ends in `.{key}` / `-{key}`.
pub(crate) fn nic_types_for(key: &str, net_config: &[VirtualNicManagerNetConfig]) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    let selects = |entry: &String| match entry.strip_suffix(key) {
        Some(rest) => rest.is_empty() || rest.ends_with(['.', '-']),
        None => false,
    };
    net_config
        .iter()
        .filter(|c| c.selected_vnic.iter().any(|s| selects(s)))
        .map(|c| c.nic_type.clone())
        .collect()
}

/// One resource pool as read from the API.
pub(crate) struct PoolNode {
    pub name: String,
    pub config: ResourceConfigSpec,
    pub children: Vec<ManagedObjectReference>,
}

/// Breadth-first walk from the cluster's root pool. Parents come out
/// before their children; the root's parent is the cluster.
pub(crate) async fn walk_pools<F, Fut>(
    root: ManagedObjectReference,
    cluster_name: &str,
    mut fetch: F,
) -> VmwareResult<Vec<ResourcePoolSource>>
where
    F: FnMut(ManagedObjectReference) -> Fut,
    Fut: Future<Output = VmwareResult<PoolNode>>,
{
    let mut queue = VecDeque::from([(root, PoolParent::Cluster(cluster_name.to_string()))]);
    let mut out = Vec::new();
    while let Some((moref, parent)) = queue.pop_front() {
        let PoolNode { name, config, children } = fetch(moref.clone()).await?;
        for child in children {
            queue.push_back((child, PoolParent::ResourcePool(name.clone())));
        }
        out.push(ResourcePoolSource {
            moref,
            name,
            parent,
            cpu: allocation(&config.cpu_allocation),
            memory: allocation(&config.memory_allocation),
        });
    }
    Ok(out)
}

fn allocation(info: &ResourceAllocationInfo) -> AllocationSource {
    let shares = info.shares.clone().unwrap_or_default();
    AllocationSource {
        shares_level: shares.level,
        shares: shares.shares,
        reservation: info.reservation,
        limit: info.limit,
        expandable_reservation: info.expandable_reservation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmwareErrorKind;
    use serde_json::json;

    fn net_config(nic_type: &str, vnics: &[&str]) -> VirtualNicManagerNetConfig {
        VirtualNicManagerNetConfig {
            nic_type: nic_type.into(),
            selected_vnic: vnics
                .iter()
                .map(|v| format!("VirtualNicManagerNetConfig.{nic_type}.key-vim.host.VirtualNic-{v}"))
                .collect(),
        }
    }

    fn cluster_ref(id: &str) -> ManagedObjectReference {
        ManagedObjectReference::new("ClusterComputeResource", id)
    }

    #[test]
    fn one_matching_cluster_resolves() {
        let cluster = single_cluster("Prod", vec![cluster_ref("domain-c8")]).unwrap().unwrap();
        assert_eq!(cluster.name, "Prod");
        assert_eq!(cluster.moref.value, "domain-c8");
        assert!(single_cluster("Prod", vec![]).unwrap().is_none());
    }

    #[test]
    fn duplicate_cluster_names_are_ambiguous() {
        let err = single_cluster("Prod", vec![cluster_ref("domain-c8"), cluster_ref("domain-c40")]).unwrap_err();
        assert_eq!(err.kind, VmwareErrorKind::AmbiguousCluster);
        assert!(err.message.contains("Prod"));
    }

    #[test]
    fn nic_types_follow_selection() {
        let config = vec![
            net_config("management", &["vmk0"]),
            net_config("vmotion", &["vmk1"]),
            net_config("vsan", &["vmk1", "vmk2"]),
        ];
        assert_eq!(nic_types_for("key-vim.host.VirtualNic-vmk0", &config), vec!["management"]);
        assert_eq!(nic_types_for("key-vim.host.VirtualNic-vmk1", &config), vec!["vmotion", "vsan"]);
        assert_eq!(nic_types_for("vmk2", &config), vec!["vsan"]);
        assert!(nic_types_for("key-vim.host.VirtualNic-vmk3", &config).is_empty());
    }

    #[test]
    fn nic_key_must_match_whole_device() {
        let config = vec![net_config("vmotion", &["vmk11"]), net_config("vsan", &["vmk1"])];
        assert_eq!(nic_types_for("vmk1", &config), vec!["vsan"]);
        assert_eq!(nic_types_for("vmk11", &config), vec!["vmotion"]);
        assert!(nic_types_for("mk1", &config).is_empty());
        assert!(nic_types_for("1", &config).is_empty());
    }

    #[test]
    fn empty_nic_key_has_no_services() {
        let config = vec![net_config("management", &["vmk0"]), net_config("vmotion", &["vmk1"])];
        assert!(nic_types_for("", &config).is_empty());
    }

    #[tokio::test]
    async fn pool_walk_tracks_parents() {
        let pool_ref = |id: &str| ManagedObjectReference::new("ResourcePool", id);
        let tree: HashMap<&str, (&str, Vec<&str>)> = HashMap::from([
            ("resgroup-7", ("Resources", vec!["resgroup-10", "resgroup-11"])),
            ("resgroup-10", ("Web", vec!["resgroup-12"])),
            ("resgroup-11", ("Db", vec![])),
            ("resgroup-12", ("Web-Canary", vec![])),
        ]);

        let pools = walk_pools(pool_ref("resgroup-7"), "Prod", |moref| {
            let node = tree.get(moref.value.as_str()).map(|(name, children)| PoolNode {
                name: name.to_string(),
                config: ResourceConfigSpec::default(),
                children: children.iter().map(|&c| pool_ref(c)).collect(),
            });
            async move { node.ok_or_else(|| VmwareError::not_found(moref.value)) }
        })
        .await
        .unwrap();

        let walked: Vec<_> = pools.iter().map(|p| (p.name.as_str(), &p.parent)).collect();
        assert_eq!(
            walked,
            vec![
                ("Resources", &PoolParent::Cluster("Prod".into())),
                ("Web", &PoolParent::ResourcePool("Resources".into())),
                ("Db", &PoolParent::ResourcePool("Resources".into())),
                ("Web-Canary", &PoolParent::ResourcePool("Web".into())),
            ]
        );
        assert_eq!(pools[3].moref.value, "resgroup-12");
    }

    #[tokio::test]
    async fn pool_walk_stops_on_fetch_error() {
        let root = ManagedObjectReference::new("ResourcePool", "resgroup-7");
        let result = walk_pools(root, "Prod", |moref| async move {
            Err::<PoolNode, _>(VmwareError::not_found(moref.value))
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn vlan_id_spec() {
        let spec = json!({ "_typeName": "VmwareDistributedVirtualSwitchVlanIdSpec", "vlanId": 100 });
        let fields = dvs_vlan_fields(Some(&spec));
        assert_eq!(fields.vlan_id, Some(json!(100)));
        assert!(fields.pvlan_id.is_none() && fields.vlan_range.is_none());
    }

    #[test]
    fn pvlan_spec() {
        let spec = json!({ "_typeName": "VmwareDistributedVirtualSwitchPvlanSpec", "pvlanId": 201 });
        assert_eq!(dvs_vlan_fields(Some(&spec)).pvlan_id, Some(json!(201)));
    }

    #[test]
    fn trunk_spec_becomes_range() {
        let spec = json!({
            "_typeName": "VmwareDistributedVirtualSwitchTrunkVlanSpec",
            "vlanId": [{ "_typeName": "NumericRange", "start": 100, "end": 200 }]
        });
        let fields = dvs_vlan_fields(Some(&spec));
        assert!(fields.vlan_id.is_none());
        assert_eq!(fields.vlan_range.unwrap()[0]["end"], 200);
    }

    #[test]
    fn missing_spec_is_empty() {
        assert_eq!(dvs_vlan_fields(None), VlanFields::default());
    }

    #[test]
    fn computed_teaming_wins() {
        let pg: HostPortGroup = serde_json::from_value(json!({
            "spec": {
                "name": "VM Network",
                "vswitchName": "vSwitch0",
                "policy": { "nicTeaming": { "nicOrder": { "activeNic": ["vmnic9"] } } }
            },
            "computedPolicy": { "nicTeaming": { "nicOrder": { "activeNic": ["vmnic0"], "standbyNic": ["vmnic1"] } } }
        }))
        .unwrap();
        let order = teaming_order(&pg).unwrap();
        assert_eq!(order.active_nic, vec!["vmnic0"]);
        assert_eq!(order.standby_nic, vec!["vmnic1"]);
    }

    #[test]
    fn allocation_flattens_shares() {
        let info = ResourceAllocationInfo {
            reservation: Some(512),
            expandable_reservation: Some(true),
            limit: Some(-1),
            shares: Some(SharesInfo { shares: Some(4000), level: Some("normal".into()) }),
        };
        let a = allocation(&info);
        assert_eq!(a.shares, Some(4000));
        assert_eq!(a.shares_level.as_deref(), Some("normal"));
        assert_eq!(a.limit, Some(-1));
    }
}
