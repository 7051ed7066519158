//! Resource-pool collection for one cluster.

use netmig_core::pool::is_reserved_pool_name;
use netmig_core::types::{ParentType, PermissionRecord, ResourcePoolRecord, SharesLevel};

use crate::error::{VmwareError, VmwareResult};
use crate::inventory::InventorySession;
use crate::outcome::Collected;
use crate::types::*;

/// Exports the user-defined resource pools of a cluster.
pub struct ResourcePoolCollector<'a> {
    session: &'a dyn InventorySession,
}

impl<'a> ResourcePoolCollector<'a> {
    pub fn new(session: &'a dyn InventorySession) -> Self {
        Self { session }
    }

    /// Fails only when the cluster cannot be resolved or its pools cannot
    /// be listed. Built-in pools are skipped; workloads and permissions
    /// degrade to empty per pool.
    pub async fn collect(&self, cluster_name: &str) -> VmwareResult<Collected<ResourcePoolRecord>> {
        let cluster = self
            .session
            .resolve_cluster(cluster_name)
            .await?
            .ok_or_else(|| VmwareError::cluster_not_found(cluster_name))?;

        let pools = self.session.list_resource_pools(&cluster).await?;
        log::info!("Cluster '{}' has {} resource pool(s) including built-ins", cluster.name, pools.len());

        let mut out = Collected::new();
        for pool in pools {
            if is_reserved_pool_name(&pool.name) {
                log::debug!("Skipping built-in pool '{}'", pool.name);
                continue;
            }

            let workloads = out.or_empty(&pool.name, "workloads", self.session.list_workloads(&pool).await);
            let permissions = out.or_empty(
                &pool.name,
                "permissions",
                self.session.list_permissions(&pool.moref).await,
            );

            out.records.push(pool_record(&cluster, pool, workloads, permissions));
        }
        Ok(out)
    }
}

fn pool_record(
    cluster: &ClusterSource,
    pool: ResourcePoolSource,
    workloads: Vec<WorkloadSource>,
    permissions: Vec<PermissionSource>,
) -> ResourcePoolRecord {
    let (parent_type, parent_name) = match pool.parent {
        PoolParent::Cluster(name) => (ParentType::Cluster, name),
        // Children of the implicit root pool belong to the cluster itself.
        PoolParent::ResourcePool(name) if is_reserved_pool_name(&name) => {
            (ParentType::Cluster, cluster.name.clone())
        }
        PoolParent::ResourcePool(name) => (ParentType::ResourcePool, name),
    };

    ResourcePoolRecord {
        name: pool.name,
        parent_type,
        parent_name,
        cpu_shares_level: shares_level(&pool.cpu),
        cpu_shares: pool.cpu.shares.unwrap_or_default(),
        cpu_reservation_mhz: pool.cpu.reservation.unwrap_or_default(),
        cpu_limit_mhz: pool.cpu.limit.unwrap_or(-1),
        cpu_expandable_reservation: pool.cpu.expandable_reservation.unwrap_or(false),
        mem_shares_level: shares_level(&pool.memory),
        mem_shares: pool.memory.shares.unwrap_or_default(),
        mem_reservation_mb: pool.memory.reservation.unwrap_or_default(),
        mem_limit_mb: pool.memory.limit.unwrap_or(-1),
        mem_expandable_reservation: pool.memory.expandable_reservation.unwrap_or(false),
        contained_workload_names: workloads.into_iter().map(|w| w.name).collect(),
        permissions: permissions.into_iter().map(permission_record).collect(),
        selected_for_migration: false,
    }
}

fn shares_level(allocation: &AllocationSource) -> SharesLevel {
    allocation
        .shares_level
        .as_deref()
        .and_then(SharesLevel::from_api)
        .unwrap_or(SharesLevel::Normal)
}

fn permission_record(p: PermissionSource) -> PermissionRecord {
    PermissionRecord {
        role: p.role_name.unwrap_or_else(|| p.role_id.to_string()),
        principal: p.principal,
        propagate: p.propagate,
        is_group: p.group,
    }
}
