//! Per-run counters. Reported in the end-of-run summary, never persisted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{DistributedSwitchRecord, ExportRecord, SwitchRecord};

#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub distributed_switches: usize,
    pub standard_switches: usize,
    pub port_groups: usize,
    pub host_profiles: usize,
    pub vmkernel_adapters: usize,
    pub resource_pools: usize,
    pub warnings: usize,
    /// Distributed switches already counted, by uuid. Host profiles repeat
    /// the same switch once per member host.
    seen_distributed: HashSet<String>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            distributed_switches: 0,
            standard_switches: 0,
            port_groups: 0,
            host_profiles: 0,
            vmkernel_adapters: 0,
            resource_pools: 0,
            warnings: 0,
            seen_distributed: HashSet::new(),
        }
    }

    /// Count one record, descending into host profiles.
    pub fn observe(&mut self, record: &ExportRecord) {
        match record {
            ExportRecord::DistributedSwitch(s) => self.observe_distributed(s),
            ExportRecord::StandardSwitch(s) => {
                self.standard_switches += 1;
                self.port_groups += s.port_groups.len();
            }
            ExportRecord::HostNetworkProfile(p) => {
                self.host_profiles += 1;
                self.vmkernel_adapters += p.vm_kernel_adapters.len();
                for switch in &p.switches {
                    match switch {
                        SwitchRecord::Distributed(s) => self.observe_distributed(s),
                        SwitchRecord::Standard(s) => {
                            self.standard_switches += 1;
                            self.port_groups += s.port_groups.len();
                        }
                    }
                }
            }
            ExportRecord::ResourcePool(_) => self.resource_pools += 1,
        }
    }

    fn observe_distributed(&mut self, s: &DistributedSwitchRecord) {
        let key = if s.uuid.is_empty() { &s.name } else { &s.uuid };
        if self.seen_distributed.insert(key.clone()) {
            self.distributed_switches += 1;
            self.port_groups += s.port_groups.len();
        }
    }

    pub fn observe_all<'a>(&mut self, records: impl IntoIterator<Item = &'a ExportRecord>) {
        for record in records {
            self.observe(record);
        }
    }

    pub fn add_warnings(&mut self, count: usize) {
        self.warnings += count;
    }

    pub fn summary_line(&self) -> String {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        format!(
            "collected {} distributed switch(es), {} standard switch(es), {} port group(s), \
             {} host profile(s), {} VMkernel adapter(s), {} resource pool(s); {} warning(s) in {:.1}s",
            self.distributed_switches,
            self.standard_switches,
            self.port_groups,
            self.host_profiles,
            self.vmkernel_adapters,
            self.resource_pools,
            self.warnings,
            elapsed.num_milliseconds() as f64 / 1000.0,
        )
    }
}

impl Default for RunStats {
    fn default() -> Self { Self::new() }
}
