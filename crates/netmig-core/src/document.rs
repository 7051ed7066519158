//! Structured (JSON) and tabular (CSV) renderings of an export document.
//!
//! The structured form is full fidelity and reads back into the same
//! records. The tabular form is a flat projection, one row per switch ×
//! port group; adapter and permission detail is dropped.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{DocumentError, DocumentErrorKind, DocumentResult};
use crate::types::*;
use crate::vlan::VlanClassification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Structured,
    Tabular,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(Self::Structured),
            "tabular" | "csv" => Ok(Self::Tabular),
            other => Err(format!("unknown output format `{other}` (expected structured or tabular)")),
        }
    }
}

/// Column headers for the switch × port-group table.
pub const SWITCH_HEADERS: &[&str] = &[
    "Kind", "Host", "Switch", "Mtu", "PortGroup", "PortGroupKey", "NumPorts",
    "VlanType", "VlanId", "VlanRangeStart", "VlanRangeEnd",
    "PortBinding", "AutoExpand", "ActiveNics", "StandbyNics",
];

/// Column headers for the resource-pool table.
pub const POOL_HEADERS: &[&str] = &[
    "Name", "ParentType", "ParentName",
    "CpuSharesLevel", "CpuShares", "CpuReservationMHz", "CpuLimitMHz",
    "MemSharesLevel", "MemShares", "MemReservationMB", "MemLimitMB",
    "Workloads", "SelectedForMigration",
];

// ── Structured ──────────────────────────────────────────────────────

pub fn write_structured<W: Write>(writer: W, doc: &[ExportRecord]) -> DocumentResult<()> {
    serde_json::to_writer_pretty(writer, doc)?;
    Ok(())
}

pub fn read_structured<R: Read>(reader: R) -> DocumentResult<ExportDocument> {
    Ok(serde_json::from_reader(reader)?)
}

// ── Tabular ─────────────────────────────────────────────────────────

/// Whether `doc` flattens into one table: `Ok(true)` for a pool table,
/// `Ok(false)` for a switch table.
fn tabular_family(doc: &[ExportRecord]) -> DocumentResult<bool> {
    let has_pools = doc.iter().any(|r| matches!(r, ExportRecord::ResourcePool(_)));
    let has_switches = doc.iter().any(|r| !matches!(r, ExportRecord::ResourcePool(_)));

    if has_pools && has_switches {
        return Err(DocumentError::new(
            DocumentErrorKind::MixedTabular,
            "tabular output cannot mix switch and resource-pool records",
        ));
    }
    Ok(has_pools)
}

pub fn write_tabular<W: Write>(writer: W, doc: &[ExportRecord]) -> DocumentResult<()> {
    let has_pools = tabular_family(doc)?;
    let mut wtr = csv::Writer::from_writer(writer);

    if has_pools {
        wtr.write_record(POOL_HEADERS)?;
        for record in doc {
            if let ExportRecord::ResourcePool(pool) = record {
                wtr.write_record(pool_row(pool))?;
            }
        }
    } else {
        wtr.write_record(SWITCH_HEADERS)?;
        let mut rows = Vec::new();
        for record in doc {
            match record {
                ExportRecord::DistributedSwitch(s) => {
                    distributed_rows(None, s, &mut rows);
                }
                ExportRecord::StandardSwitch(s) => standard_rows(s, &mut rows),
                ExportRecord::HostNetworkProfile(profile) => {
                    for switch in &profile.switches {
                        match switch {
                            SwitchRecord::Distributed(s) => {
                                distributed_rows(Some(&profile.host_name), s, &mut rows)
                            }
                            SwitchRecord::Standard(s) => standard_rows(s, &mut rows),
                        }
                    }
                }
                ExportRecord::ResourcePool(_) => {}
            }
        }
        for row in rows {
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn distributed_rows(host: Option<&str>, s: &DistributedSwitchRecord, rows: &mut Vec<Vec<String>>) {
    let head = [
        "Distributed".to_string(),
        host.unwrap_or_default().to_string(),
        s.name.clone(),
        s.mtu.to_string(),
    ];
    if s.port_groups.is_empty() {
        rows.push(pad(&head));
        return;
    }
    for pg in &s.port_groups {
        let mut row = head.to_vec();
        row.push(pg.name.clone());
        row.push(pg.key.clone());
        row.push(pg.num_ports.to_string());
        row.extend(vlan_columns(&pg.vlan));
        row.push(pg.port_binding_mode.as_str().to_string());
        row.push(pg.auto_expand.to_string());
        row.push(String::new());
        row.push(String::new());
        rows.push(row);
    }
}

fn standard_rows(s: &StandardSwitchRecord, rows: &mut Vec<Vec<String>>) {
    let head = [
        "Standard".to_string(),
        s.host_name.clone(),
        s.name.clone(),
        s.mtu.to_string(),
    ];
    if s.port_groups.is_empty() {
        rows.push(pad(&head));
        return;
    }
    for pg in &s.port_groups {
        let mut row = head.to_vec();
        row.push(pg.name.clone());
        row.push(String::new());
        row.push(pg.num_ports.to_string());
        row.extend(vlan_columns(&pg.vlan));
        row.push(String::new());
        row.push(String::new());
        row.push(pg.active_nics.join(";"));
        row.push(pg.standby_nics.join(";"));
        rows.push(row);
    }
}

fn pad(head: &[String]) -> Vec<String> {
    let mut row = head.to_vec();
    row.resize(SWITCH_HEADERS.len(), String::new());
    row
}

/// `VlanType`, `VlanId`, `VlanRangeStart`, `VlanRangeEnd`.
fn vlan_columns(vlan: &VlanClassification) -> [String; 4] {
    let kind = vlan.vlan_type().to_string();
    match *vlan {
        VlanClassification::None => [kind, String::new(), String::new(), String::new()],
        VlanClassification::Vlan { id } | VlanClassification::Pvlan { id } => {
            [kind, id.to_string(), String::new(), String::new()]
        }
        VlanClassification::Range { start, end } => {
            [kind, String::new(), start.to_string(), end.to_string()]
        }
    }
}

fn pool_row(pool: &ResourcePoolRecord) -> Vec<String> {
    vec![
        pool.name.clone(),
        pool.parent_type.as_str().to_string(),
        pool.parent_name.clone(),
        pool.cpu_shares_level.to_string(),
        pool.cpu_shares.to_string(),
        pool.cpu_reservation_mhz.to_string(),
        pool.cpu_limit_mhz.to_string(),
        pool.mem_shares_level.to_string(),
        pool.mem_shares.to_string(),
        pool.mem_reservation_mb.to_string(),
        pool.mem_limit_mb.to_string(),
        pool.contained_workload_names.join(";"),
        pool.selected_for_migration.to_string(),
    ]
}

// ── File output ─────────────────────────────────────────────────────

/// Write `doc` to `path` in the requested format, creating parent
/// directories as needed. A document the format cannot hold is rejected
/// before anything is created.
pub fn write_document(path: &Path, format: OutputFormat, doc: &[ExportRecord]) -> DocumentResult<()> {
    if format == OutputFormat::Tabular {
        tabular_family(doc)?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Structured => write_structured(&mut out, doc)?,
        OutputFormat::Tabular => write_tabular(&mut out, doc)?,
    }
    out.flush()?;
    log::info!("wrote {} record(s) to {}", doc.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dvs(port_groups: Vec<DistributedPortGroupRecord>) -> DistributedSwitchRecord {
        DistributedSwitchRecord {
            name: "DVS-Prod".into(),
            uuid: "50 1a".into(),
            version: "8.0.0".into(),
            vendor: "VMware, Inc.".into(),
            build: "1".into(),
            mtu: 1500,
            max_ports: 2048,
            num_standalone_ports: 0,
            link_discovery_protocol: None,
            link_discovery_operation: None,
            contact_name: String::new(),
            contact_info: String::new(),
            description: String::new(),
            num_uplink_ports: 0,
            uplink_port_names: vec![],
            port_groups,
        }
    }

    fn dvpg(name: &str, vlan: VlanClassification) -> DistributedPortGroupRecord {
        DistributedPortGroupRecord {
            key: format!("dvportgroup-{name}"),
            name: name.into(),
            num_ports: 8,
            vlan,
            vlan_trunk_ranges: vec![],
            port_binding_mode: PortBindingMode::Static,
            auto_expand: true,
        }
    }

    fn pool(name: &str) -> ResourcePoolRecord {
        ResourcePoolRecord {
            name: name.into(),
            parent_type: ParentType::Cluster,
            parent_name: "Cluster-A".into(),
            cpu_shares_level: SharesLevel::Normal,
            cpu_shares: 4000,
            cpu_reservation_mhz: 0,
            cpu_limit_mhz: -1,
            cpu_expandable_reservation: true,
            mem_shares_level: SharesLevel::Normal,
            mem_shares: 163840,
            mem_reservation_mb: 0,
            mem_limit_mb: -1,
            mem_expandable_reservation: true,
            contained_workload_names: vec!["web01".into(), "web02".into()],
            permissions: vec![],
            selected_for_migration: false,
        }
    }

    fn tabular(doc: &[ExportRecord]) -> String {
        let mut buf = Vec::new();
        write_tabular(&mut buf, doc).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_document_is_an_empty_array() {
        let mut buf = Vec::new();
        write_structured(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]");
    }

    #[test]
    fn one_row_per_port_group() {
        let doc = vec![ExportRecord::DistributedSwitch(dvs(vec![
            dvpg("Web", VlanClassification::Vlan { id: 100 }),
            dvpg("Trunk", VlanClassification::Range { start: 100, end: 200 }),
        ]))];
        let out = tabular(&doc);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Distributed,,DVS-Prod,1500,Web,dvportgroup-Web,8,VLAN,100,,,Static,true"));
        assert!(lines[2].contains("VLANRange,,100,200"));
    }

    #[test]
    fn switch_without_port_groups_keeps_a_row() {
        let out = tabular(&[ExportRecord::DistributedSwitch(dvs(vec![]))]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].split(',').count(), SWITCH_HEADERS.len());
    }

    #[test]
    fn pools_get_their_own_table() {
        let out = tabular(&[ExportRecord::ResourcePool(pool("Prod"))]);
        assert!(out.starts_with("Name,ParentType"));
        assert!(out.contains("Prod,Cluster,Cluster-A,Normal,4000,0,-1"));
        assert!(out.contains("web01;web02"));
    }

    #[test]
    fn mixed_families_are_rejected() {
        let doc = vec![
            ExportRecord::ResourcePool(pool("Prod")),
            ExportRecord::DistributedSwitch(dvs(vec![])),
        ];
        let err = write_tabular(Vec::<u8>::new(), &doc).unwrap_err();
        assert_eq!(err.kind, DocumentErrorKind::MixedTabular);
    }

    #[test]
    fn rejected_tabular_document_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.csv");
        let doc = vec![
            ExportRecord::DistributedSwitch(dvs(vec![])),
            ExportRecord::ResourcePool(pool("Prod")),
        ];
        let err = write_document(&path, OutputFormat::Tabular, &doc).unwrap_err();
        assert_eq!(err.kind, DocumentErrorKind::MixedTabular);
        assert!(!path.exists());
    }

    #[test]
    fn write_document_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_document(&path, OutputFormat::Structured, &[]).unwrap();
        let back = read_structured(File::open(&path).unwrap()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn format_parse() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Tabular);
        assert_eq!("Structured".parse::<OutputFormat>().unwrap(), OutputFormat::Structured);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
