//! # netmig-core – portable virtual-network configuration schema
//!
//! Data model and normalization policies shared by every collector, plus
//! the two document renderings.
//!
//! ## Modules
//!
//! - **types** — Switch, port-group, VMkernel, host-profile and resource-pool records
//! - **vlan** — VLAN classification precedence policy
//! - **pool** — Reserved (built-in) resource-pool names
//! - **stats** — Per-run counters for the end-of-run summary
//! - **document** — Structured (JSON) and tabular (CSV) output
//! - **error** — Document output errors

pub mod types;
pub mod vlan;
pub mod pool;
pub mod stats;
pub mod document;
pub mod error;
