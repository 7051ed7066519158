//! Error types for the vSphere collection crate.

use std::fmt;

/// Categorised error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmwareErrorKind {
    /// vSphere API unreachable or session expired
    ConnectionError,
    /// Authentication failed (401 / InvalidLogin)
    AuthenticationError,
    /// Managed object or property not found (404)
    NotFound,
    /// Permission denied (403)
    AccessDenied,
    /// HTTP / API error with status code
    ApiError(u16),
    /// Timeout
    Timeout,
    /// JSON parse / deserialization error
    ParseError,
    /// No cluster carries the requested name
    ClusterNotFound,
    /// More than one cluster carries the requested name
    AmbiguousCluster,
    /// Endpoint is not a vCenter (distributed switches need one)
    UnsupportedServer,
    /// Generic
    Other,
}

/// Crate error type carrying a kind + human-readable message.
#[derive(Debug, Clone)]
pub struct VmwareError {
    pub kind: VmwareErrorKind,
    pub message: String,
}

impl VmwareError {
    pub fn new(kind: VmwareErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ConnectionError, msg)
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::AuthenticationError, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::NotFound, msg)
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ApiError(status), msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ParseError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::Timeout, msg)
    }

    pub fn cluster_not_found(name: &str) -> Self {
        Self::new(VmwareErrorKind::ClusterNotFound, format!("Cluster '{name}' not found"))
    }

    pub fn ambiguous_cluster(name: &str, count: usize) -> Self {
        Self::new(
            VmwareErrorKind::AmbiguousCluster,
            format!("Cluster name '{name}' matches {count} clusters"),
        )
    }
}

impl fmt::Display for VmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for VmwareError {}

impl From<reqwest::Error> for VmwareError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("HTTP timeout: {e}"))
        } else if e.is_connect() {
            Self::connection(format!("Connection failed: {e}"))
        } else {
            Self::new(VmwareErrorKind::Other, format!("HTTP error: {e}"))
        }
    }
}

impl From<serde_json::Error> for VmwareError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {e}"))
    }
}

/// Convenience alias.
pub type VmwareResult<T> = Result<T, VmwareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        let err = VmwareError::cluster_not_found("Prod");
        assert_eq!(err.to_string(), "[ClusterNotFound] Cluster 'Prod' not found");
    }
}
