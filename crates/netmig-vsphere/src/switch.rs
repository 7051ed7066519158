//! Switch topology collection.

use netmig_core::types::{
    DistributedPortGroupRecord, DistributedSwitchRecord, PortBindingMode, StandardPortGroupRecord,
    StandardSwitchRecord, SwitchRecord,
};
use netmig_core::vlan::{resolve_vlan, VlanClassification, VlanResolution};

use crate::error::VmwareResult;
use crate::inventory::InventorySession;
use crate::outcome::{Collected, CollectionWarning, Outcome};
use crate::types::*;

/// MTU reported when the source leaves it unset.
pub const DEFAULT_MTU: u32 = 1500;

/// Walks every distributed switch, and optionally every host's standard
/// switches, into [`SwitchRecord`]s.
pub struct SwitchTopologyCollector<'a> {
    session: &'a dyn InventorySession,
}

impl<'a> SwitchTopologyCollector<'a> {
    pub fn new(session: &'a dyn InventorySession) -> Self {
        Self { session }
    }

    /// Distributed switches first, then standard switches host by host.
    /// Only listing the distributed switches or the hosts is fatal.
    pub async fn collect(&self, include_standard: bool) -> VmwareResult<Collected<SwitchRecord>> {
        let mut out = Collected::new();

        let switches = self.session.list_distributed_switches().await?;
        log::info!("Found {} distributed switch(es)", switches.len());
        for dvs in switches {
            let record = collect_switch(self.session, &SwitchSource::Distributed(dvs), &mut out.warnings).await;
            out.records.push(record);
        }

        if include_standard {
            for host in self.session.list_hosts().await? {
                let standard = Outcome::from_result(
                    &host.name,
                    "standard switches",
                    self.session.list_standard_switches(&host).await,
                );
                let switches = match standard {
                    Outcome::Ok(s) => s,
                    Outcome::Warning(w) => {
                        out.warnings.push(w);
                        continue;
                    }
                };
                if switches.is_empty() {
                    log::debug!("{}: no standard switches", host.name);
                }
                for vss in switches {
                    let record = collect_switch(self.session, &SwitchSource::Standard(vss), &mut out.warnings).await;
                    out.records.push(record);
                }
            }
        }

        Ok(out)
    }
}

/// One switch with its port groups. A failed port-group listing leaves the
/// switch with none and records a warning against the switch.
pub(crate) async fn collect_switch(
    session: &dyn InventorySession,
    switch: &SwitchSource,
    warnings: &mut Vec<CollectionWarning>,
) -> SwitchRecord {
    let groups = collect_port_groups(session, switch, warnings).await;
    let record = switch_record(switch, groups);
    log::debug!(
        "{} switch {}: {} port group(s)",
        record.kind_str(),
        record.name(),
        record.port_group_count()
    );
    record
}

/// A port group with its VLAN settings already classified.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPortGroup {
    pub source: PortGroupSource,
    pub vlan: VlanResolution,
}

/// Port-group walk shared by the topology and host collectors.
pub(crate) async fn collect_port_groups(
    session: &dyn InventorySession,
    switch: &SwitchSource,
    warnings: &mut Vec<CollectionWarning>,
) -> Vec<ResolvedPortGroup> {
    let sources = match session.list_port_groups(switch).await {
        Ok(s) => s,
        Err(e) => {
            warnings.push(CollectionWarning::new(switch_label(switch), format!("port groups: {e}")));
            return Vec::new();
        }
    };

    sources
        .into_iter()
        .map(|source| {
            let vlan = resolve_vlan(&source.vlan).unwrap_or_else(|e| {
                let entity = format!("{}/{}", switch_label(switch), source.name);
                warnings.push(CollectionWarning::new(entity, format!("{e}; VLAN set to None")));
                VlanResolution {
                    classification: VlanClassification::None,
                    additional_ranges: Vec::new(),
                }
            });
            ResolvedPortGroup { source, vlan }
        })
        .collect()
}

fn switch_label(switch: &SwitchSource) -> String {
    match switch {
        SwitchSource::Distributed(_) => switch.name().to_string(),
        SwitchSource::Standard(s) => format!("{}/{}", s.host_name, s.name),
    }
}

pub(crate) fn switch_record(switch: &SwitchSource, groups: Vec<ResolvedPortGroup>) -> SwitchRecord {
    match switch {
        SwitchSource::Distributed(s) => SwitchRecord::Distributed(DistributedSwitchRecord {
            name: s.name.clone(),
            uuid: s.uuid.clone(),
            version: s.version.clone().unwrap_or_default(),
            vendor: s.vendor.clone().unwrap_or_default(),
            build: s.build.clone().unwrap_or_default(),
            mtu: s.max_mtu.unwrap_or(DEFAULT_MTU),
            max_ports: s.max_ports.unwrap_or_default(),
            num_standalone_ports: s.num_standalone_ports.unwrap_or_default(),
            link_discovery_protocol: s.link_discovery_protocol.clone(),
            link_discovery_operation: s.link_discovery_operation.clone(),
            contact_name: s.contact_name.clone().unwrap_or_default(),
            contact_info: s.contact_info.clone().unwrap_or_default(),
            description: s.description.clone().unwrap_or_default(),
            num_uplink_ports: s.uplink_port_names.len() as u32,
            uplink_port_names: s.uplink_port_names.clone(),
            port_groups: groups.into_iter().map(distributed_port_group).collect(),
        }),
        SwitchSource::Standard(s) => SwitchRecord::Standard(StandardSwitchRecord {
            name: s.name.clone(),
            host_name: s.host_name.clone(),
            mtu: s.mtu.unwrap_or(DEFAULT_MTU),
            num_ports: s.num_ports.unwrap_or_default(),
            port_groups: groups.into_iter().map(standard_port_group).collect(),
        }),
    }
}

fn distributed_port_group(pg: ResolvedPortGroup) -> DistributedPortGroupRecord {
    let ResolvedPortGroup { source, vlan } = pg;
    DistributedPortGroupRecord {
        key: source.key.unwrap_or_default(),
        name: source.name,
        num_ports: source.num_ports.unwrap_or_default(),
        vlan: vlan.classification,
        vlan_trunk_ranges: vlan.additional_ranges,
        port_binding_mode: source
            .binding
            .as_deref()
            .map(PortBindingMode::from_api)
            .unwrap_or_default(),
        auto_expand: source.auto_expand.unwrap_or(false),
    }
}

fn standard_port_group(pg: ResolvedPortGroup) -> StandardPortGroupRecord {
    let ResolvedPortGroup { source, vlan } = pg;
    StandardPortGroupRecord {
        name: source.name,
        num_ports: source.num_ports.unwrap_or_default(),
        vlan: vlan.classification,
        active_nics: source.active_nics.unwrap_or_default(),
        standby_nics: source.standby_nics.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmwareErrorKind;
    use crate::test_support::*;
    use netmig_core::vlan::{VlanFields, VlanRange};
    use serde_json::json;

    fn prod_inventory() -> FakeInventory {
        let mut inv = FakeInventory {
            distributed: vec![dvs("dvs-1", "DVS-Prod", &["host-1"])],
            ..Default::default()
        };
        inv.port_groups.insert(
            "DVS-Prod".into(),
            vec![
                port_group("Web", VlanFields::vlan(100)),
                port_group("Trunk", VlanFields::range(json!([{ "Start": 100, "End": 200 }]))),
            ],
        );
        inv
    }

    #[tokio::test]
    async fn distributed_vlan_scenarios() {
        let inv = prod_inventory();
        let out = SwitchTopologyCollector::new(&inv).collect(false).await.unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.records.len(), 1);

        let SwitchRecord::Distributed(sw) = &out.records[0] else {
            panic!("expected distributed switch");
        };
        assert_eq!(sw.name, "DVS-Prod");
        assert_eq!(sw.mtu, 9000);
        assert_eq!(sw.num_uplink_ports, 2);
        assert_eq!(sw.port_groups[0].vlan, VlanClassification::Vlan { id: 100 });
        assert_eq!(sw.port_groups[0].vlan.vlan_type(), "VLAN");
        assert_eq!(sw.port_groups[0].port_binding_mode, PortBindingMode::Static);
        assert_eq!(sw.port_groups[1].vlan, VlanClassification::Range { start: 100, end: 200 });
        assert!(out.records[0].host_name().is_none());
    }

    #[tokio::test]
    async fn malformed_vlan_degrades_single_port_group() {
        let mut inv = prod_inventory();
        inv.port_groups.get_mut("DVS-Prod").unwrap().push(port_group("Broken", VlanFields::vlan("abc")));

        let out = SwitchTopologyCollector::new(&inv).collect(false).await.unwrap();
        let SwitchRecord::Distributed(sw) = &out.records[0] else {
            panic!("expected distributed switch");
        };
        assert_eq!(sw.port_groups.len(), 3);
        assert_eq!(sw.port_groups[2].vlan, VlanClassification::None);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].entity, "DVS-Prod/Broken");
    }

    #[tokio::test]
    async fn additional_trunk_ranges_are_kept() {
        let mut inv = prod_inventory();
        inv.port_groups.insert(
            "DVS-Prod".into(),
            vec![port_group(
                "Trunk",
                VlanFields::range(json!([{ "start": 10, "end": 20 }, { "start": 300, "end": 310 }])),
            )],
        );
        let out = SwitchTopologyCollector::new(&inv).collect(false).await.unwrap();
        let SwitchRecord::Distributed(sw) = &out.records[0] else {
            panic!("expected distributed switch");
        };
        assert_eq!(sw.port_groups[0].vlan, VlanClassification::Range { start: 10, end: 20 });
        assert_eq!(sw.port_groups[0].vlan_trunk_ranges, vec![VlanRange::new(300, 310).unwrap()]);
    }

    #[tokio::test]
    async fn port_group_failure_is_per_switch() {
        let mut inv = prod_inventory().fail("port_groups:DVS-Prod");
        inv.distributed.push(dvs("dvs-2", "DVS-Lab", &[]));
        inv.port_groups.insert("DVS-Lab".into(), vec![port_group("Lab", VlanFields::default())]);

        let out = SwitchTopologyCollector::new(&inv).collect(false).await.unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].port_group_count(), 0);
        assert_eq!(out.records[1].port_group_count(), 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].entity, "DVS-Prod");
    }

    #[tokio::test]
    async fn standard_switches_per_host() {
        let mut inv = prod_inventory();
        inv.hosts = vec![host("host-1", "esx01"), host("host-2", "esx02")];
        inv.standard.insert(
            "esx01".into(),
            vec![StandardSwitchSource {
                host_id: "host-1".into(),
                host_name: "esx01".into(),
                name: "vSwitch0".into(),
                mtu: None,
                num_ports: Some(128),
            }],
        );
        inv.port_groups.insert(
            "esx01/vSwitch0".into(),
            vec![PortGroupSource {
                name: "VM Network".into(),
                num_ports: Some(3),
                vlan: VlanFields::vlan(0),
                ..Default::default()
            }],
        );

        let out = SwitchTopologyCollector::new(&inv).collect(true).await.unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.records.len(), 2);

        let SwitchRecord::Standard(vss) = &out.records[1] else {
            panic!("expected standard switch");
        };
        assert_eq!(vss.host_name, "esx01");
        assert_eq!(vss.mtu, DEFAULT_MTU);
        let pg = &vss.port_groups[0];
        assert_eq!(pg.vlan, VlanClassification::None);
        assert!(pg.active_nics.is_empty() && pg.standby_nics.is_empty());
    }

    #[tokio::test]
    async fn listing_switches_is_fatal() {
        let inv = prod_inventory().fail("distributed_switches");
        let err = SwitchTopologyCollector::new(&inv).collect(true).await.unwrap_err();
        assert_eq!(err.kind, VmwareErrorKind::AccessDenied);
    }
}
