//! # netmig-vsphere – vCenter inventory collection
//!
//! Reads virtual networking and resource-pool configuration out of a
//! vCenter over the VI/JSON API and turns it into `netmig-core` records.
//!
//! ## Modules
//!
//! - **types** — Connection config and raw inventory shapes
//! - **error** — Crate-specific error types
//! - **vsphere** — VI/JSON HTTP client with session-based auth
//! - **vim** — VI/JSON wire types
//! - **inventory** — `InventorySession` trait and its vCenter implementation
//! - **outcome** — Per-item results and collection warnings
//! - **switch** — Distributed / standard switch topology collector
//! - **host** — Per-host network profile collector
//! - **pool** — Resource-pool collector
//! - **service** — Session lifecycle around one export run

pub mod types;
pub mod error;
pub mod vsphere;
pub mod vim;
pub mod inventory;
pub mod outcome;
pub mod switch;
pub mod host;
pub mod pool;
pub mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
