//! Per-host network profiles.

use std::collections::{BTreeSet, HashSet};

use netmig_core::types::{HostNetworkProfile, ServiceFlag, SwitchRecord, VmKernelAdapterRecord};

use crate::error::VmwareResult;
use crate::inventory::InventorySession;
use crate::outcome::{Collected, CollectionWarning};
use crate::switch::{collect_switch, DEFAULT_MTU};
use crate::types::*;

/// Builds one [`HostNetworkProfile`] per visible host.
pub struct HostNetworkCollector<'a> {
    session: &'a dyn InventorySession,
}

impl<'a> HostNetworkCollector<'a> {
    pub fn new(session: &'a dyn InventorySession) -> Self {
        Self { session }
    }

    /// Only listing the hosts is fatal. Each host's standard switches,
    /// distributed switches and adapters fail independently and leave an
    /// empty sequence behind.
    pub async fn collect(&self) -> VmwareResult<Collected<HostNetworkProfile>> {
        let mut out = Collected::new();

        let distributed = self.distributed_switches(&mut out).await;
        let hosts = self.session.list_hosts().await?;
        log::info!("Collecting network profiles for {} host(s)", hosts.len());

        for host in &hosts {
            let mut switches = Vec::new();

            let standard = out.or_empty(
                &host.name,
                "standard switches",
                self.session.list_standard_switches(host).await,
            );
            for vss in standard {
                switches.push(collect_switch(self.session, &SwitchSource::Standard(vss), &mut out.warnings).await);
            }

            match &distributed {
                Ok(list) => switches.extend(
                    list.iter()
                        .filter(|(members, _)| members.iter().any(|id| *id == host.id))
                        .map(|(_, record)| record.clone()),
                ),
                Err(e) => {
                    // Listing failed once for the whole run; attribute it to every host.
                    out.warnings.push(CollectionWarning::new(
                        &host.name,
                        format!("distributed switches unavailable: {e}"),
                    ));
                }
            }

            let adapters = out.or_empty(
                &host.name,
                "VMkernel adapters",
                self.session.list_vmkernel_adapters(host).await,
            );
            let vm_kernel_adapters: Vec<_> = adapters.into_iter().map(adapter_record).collect();

            log::debug!(
                "{}: {} switch(es), {} VMkernel adapter(s)",
                host.name,
                switches.len(),
                vm_kernel_adapters.len()
            );
            out.records.push(HostNetworkProfile {
                host_name: host.name.clone(),
                switches,
                vm_kernel_adapters,
            });
        }

        let switch_count: usize = out.records.iter().map(|p| p.switches.len()).sum();
        let adapter_count: usize = out.records.iter().map(|p| p.vm_kernel_adapters.len()).sum();
        log::info!(
            "Host network collection: {} host(s), {} switch(es), {} VMkernel adapter(s), {} warning(s)",
            out.records.len(),
            switch_count,
            adapter_count,
            out.warnings.len()
        );
        Ok(out)
    }

    /// Every distributed switch with its member host ids, port groups walked
    /// once.
    async fn distributed_switches(
        &self,
        out: &mut Collected<HostNetworkProfile>,
    ) -> VmwareResult<Vec<(Vec<String>, SwitchRecord)>> {
        let switches = match self.session.list_distributed_switches().await {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Could not list distributed switches: {e}");
                return Err(e);
            }
        };

        let mut records = Vec::with_capacity(switches.len());
        let mut seen = HashSet::new();
        for dvs in switches {
            if !seen.insert(dvs.id.clone()) {
                continue;
            }
            let members = dvs.member_host_ids.clone();
            let record = collect_switch(self.session, &SwitchSource::Distributed(dvs), &mut out.warnings).await;
            records.push((members, record));
        }
        Ok(records)
    }
}

fn adapter_record(source: VmKernelAdapterSource) -> VmKernelAdapterRecord {
    let service_flags: BTreeSet<ServiceFlag> = source
        .nic_types
        .iter()
        .filter_map(|t| ServiceFlag::from_nic_type(t))
        .collect();

    VmKernelAdapterRecord {
        name: source.device,
        ip_address: source.ip_address.unwrap_or_default(),
        subnet_mask: source.subnet_mask.unwrap_or_default(),
        dhcp: source.dhcp.unwrap_or(false),
        mac_address: source.mac.unwrap_or_default(),
        v_switch_name: source.switch_name.unwrap_or_default(),
        port_group_name: source.port_group.unwrap_or_default(),
        mtu: source.mtu.unwrap_or(DEFAULT_MTU),
        service_flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use netmig_core::vlan::VlanFields;

    fn vmk(device: &str, nic_types: &[&str]) -> VmKernelAdapterSource {
        VmKernelAdapterSource {
            device: device.into(),
            ip_address: Some("10.0.0.11".into()),
            subnet_mask: Some("255.255.255.0".into()),
            mtu: Some(9000),
            switch_name: Some("DVS-Prod".into()),
            port_group: Some("vMotion".into()),
            nic_types: nic_types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn inventory() -> FakeInventory {
        let mut inv = FakeInventory {
            distributed: vec![dvs("dvs-1", "DVS-Prod", &["host-1", "host-2"])],
            hosts: vec![host("host-1", "esx01"), host("host-2", "esx02")],
            ..Default::default()
        };
        inv.port_groups.insert("DVS-Prod".into(), vec![port_group("Web", VlanFields::vlan(100))]);
        inv.adapters.insert(
            "esx01".into(),
            vec![vmk("vmk0", &["management"]), vmk("vmk1", &["vmotion", "vsan", "vSphereReplication"])],
        );
        inv.adapters.insert("esx02".into(), vec![vmk("vmk0", &[])]);
        inv
    }

    #[tokio::test]
    async fn host_without_standard_switches_sees_distributed_only() {
        let inv = inventory();
        let out = HostNetworkCollector::new(&inv).collect().await.unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.records.len(), 2);

        let esx01 = &out.records[0];
        assert_eq!(esx01.switches.len(), 1);
        assert!(matches!(&esx01.switches[0], SwitchRecord::Distributed(s) if s.name == "DVS-Prod"));
        assert_eq!(esx01.switches[0].port_group_count(), 1);
    }

    #[tokio::test]
    async fn service_flags_are_a_set() {
        let inv = inventory();
        let out = HostNetworkCollector::new(&inv).collect().await.unwrap();

        let adapters = &out.records[0].vm_kernel_adapters;
        assert_eq!(adapters[0].service_flags, BTreeSet::from([ServiceFlag::Management]));
        assert_eq!(
            adapters[1].service_flags,
            BTreeSet::from([ServiceFlag::VMotion, ServiceFlag::StorageTraffic])
        );
        assert!(out.records[1].vm_kernel_adapters[0].service_flags.is_empty());
    }

    #[tokio::test]
    async fn per_host_failures_keep_the_profile() {
        let inv = inventory().fail("adapters:esx01").fail("standard:esx02");
        let out = HostNetworkCollector::new(&inv).collect().await.unwrap();

        assert_eq!(out.records.len(), 2);
        assert!(out.records[0].vm_kernel_adapters.is_empty());
        assert_eq!(out.records[0].switches.len(), 1);
        assert_eq!(out.records[1].vm_kernel_adapters.len(), 1);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.warnings[0].entity, "esx01");
        assert_eq!(out.warnings[1].entity, "esx02");
    }

    #[tokio::test]
    async fn distributed_listing_failure_is_per_host() {
        let inv = inventory().fail("distributed_switches");
        let out = HostNetworkCollector::new(&inv).collect().await.unwrap();
        assert_eq!(out.records.len(), 2);
        assert!(out.records.iter().all(|p| p.switches.is_empty()));
        assert_eq!(out.warnings.len(), 2);
        for w in &out.warnings {
            assert!(w.reason.starts_with("distributed switches unavailable: "));
            assert!(w.reason.contains("simulated failure for distributed_switches"));
        }
    }

    #[tokio::test]
    async fn non_member_host_gets_no_distributed_switch() {
        let mut inv = inventory();
        inv.distributed[0].member_host_ids = vec!["host-2".into()];
        let out = HostNetworkCollector::new(&inv).collect().await.unwrap();
        assert!(out.records[0].switches.is_empty());
        assert_eq!(out.records[1].switches.len(), 1);
    }

    #[tokio::test]
    async fn listing_hosts_is_fatal() {
        let inv = inventory().fail("hosts");
        assert!(HostNetworkCollector::new(&inv).collect().await.is_err());
    }
}
