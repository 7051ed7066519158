//! In-memory inventory for collector tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use netmig_core::vlan::VlanFields;

use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::inventory::{single_cluster, InventorySession};
use crate::types::*;

/// Canned inventory. Port groups are keyed by switch name for distributed
/// switches and `host/switch` for standard ones. Any call whose key is in
/// `failing` returns an access-denied error.
#[derive(Default)]
pub struct FakeInventory {
    pub distributed: Vec<DistributedSwitchSource>,
    pub port_groups: HashMap<String, Vec<PortGroupSource>>,
    pub hosts: Vec<HostSource>,
    pub standard: HashMap<String, Vec<StandardSwitchSource>>,
    pub adapters: HashMap<String, Vec<VmKernelAdapterSource>>,
    pub clusters: Vec<ClusterSource>,
    pub pools: Vec<ResourcePoolSource>,
    pub workloads: HashMap<String, Vec<WorkloadSource>>,
    pub permissions: HashMap<String, Vec<PermissionSource>>,
    pub failing: HashSet<String>,
}

impl FakeInventory {
    pub fn fail(mut self, key: impl Into<String>) -> Self {
        self.failing.insert(key.into());
        self
    }

    fn check(&self, key: &str) -> VmwareResult<()> {
        if self.failing.contains(key) {
            Err(VmwareError::new(VmwareErrorKind::AccessDenied, format!("simulated failure for {key}")))
        } else {
            Ok(())
        }
    }
}

pub fn dvs(id: &str, name: &str, members: &[&str]) -> DistributedSwitchSource {
    DistributedSwitchSource {
        id: id.into(),
        name: name.into(),
        uuid: format!("50 1a {id}"),
        version: Some("8.0.0".into()),
        vendor: Some("VMware, Inc.".into()),
        max_mtu: Some(9000),
        max_ports: Some(512),
        num_standalone_ports: Some(0),
        uplink_port_names: vec!["uplink1".into(), "uplink2".into()],
        member_host_ids: members.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    }
}

pub fn port_group(name: &str, vlan: VlanFields) -> PortGroupSource {
    PortGroupSource {
        key: Some(format!("dvportgroup-{name}")),
        name: name.into(),
        num_ports: Some(8),
        binding: Some("earlyBinding".into()),
        auto_expand: Some(true),
        vlan,
        ..Default::default()
    }
}

pub fn host(id: &str, name: &str) -> HostSource {
    HostSource { id: id.into(), name: name.into() }
}

pub fn pool(id: &str, name: &str, parent: PoolParent) -> ResourcePoolSource {
    ResourcePoolSource {
        moref: ManagedObjectReference::new("ResourcePool", id),
        name: name.into(),
        parent,
        cpu: AllocationSource {
            shares_level: Some("normal".into()),
            shares: Some(4000),
            reservation: Some(0),
            limit: Some(-1),
            expandable_reservation: Some(true),
        },
        memory: AllocationSource {
            shares_level: Some("high".into()),
            shares: Some(327680),
            reservation: Some(2048),
            limit: Some(-1),
            expandable_reservation: Some(false),
        },
    }
}

#[async_trait]
impl InventorySession for FakeInventory {
    async fn list_distributed_switches(&self) -> VmwareResult<Vec<DistributedSwitchSource>> {
        self.check("distributed_switches")?;
        Ok(self.distributed.clone())
    }

    async fn list_port_groups(&self, switch: &SwitchSource) -> VmwareResult<Vec<PortGroupSource>> {
        let key = match switch {
            SwitchSource::Distributed(s) => s.name.clone(),
            SwitchSource::Standard(s) => format!("{}/{}", s.host_name, s.name),
        };
        self.check(&format!("port_groups:{key}"))?;
        Ok(self.port_groups.get(&key).cloned().unwrap_or_default())
    }

    async fn list_hosts(&self) -> VmwareResult<Vec<HostSource>> {
        self.check("hosts")?;
        Ok(self.hosts.clone())
    }

    async fn list_standard_switches(&self, host: &HostSource) -> VmwareResult<Vec<StandardSwitchSource>> {
        self.check(&format!("standard:{}", host.name))?;
        Ok(self.standard.get(&host.name).cloned().unwrap_or_default())
    }

    async fn list_vmkernel_adapters(&self, host: &HostSource) -> VmwareResult<Vec<VmKernelAdapterSource>> {
        self.check(&format!("adapters:{}", host.name))?;
        Ok(self.adapters.get(&host.name).cloned().unwrap_or_default())
    }

    async fn resolve_cluster(&self, name: &str) -> VmwareResult<Option<ClusterSource>> {
        self.check("clusters")?;
        let matches = self
            .clusters
            .iter()
            .filter(|c| c.name == name)
            .map(|c| c.moref.clone())
            .collect();
        single_cluster(name, matches)
    }

    async fn list_resource_pools(&self, _cluster: &ClusterSource) -> VmwareResult<Vec<ResourcePoolSource>> {
        self.check("pools")?;
        Ok(self.pools.clone())
    }

    async fn list_workloads(&self, pool: &ResourcePoolSource) -> VmwareResult<Vec<WorkloadSource>> {
        self.check(&format!("workloads:{}", pool.name))?;
        Ok(self.workloads.get(&pool.name).cloned().unwrap_or_default())
    }

    async fn list_permissions(&self, entity: &ManagedObjectReference) -> VmwareResult<Vec<PermissionSource>> {
        self.check(&format!("permissions:{}", entity.value))?;
        Ok(self.permissions.get(&entity.value).cloned().unwrap_or_default())
    }
}
