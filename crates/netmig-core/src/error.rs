//! Error types for document output.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentErrorKind {
    /// File could not be created or written
    Io,
    /// Structured (JSON) encode / decode failure
    Json,
    /// Tabular (CSV) encode failure
    Csv,
    /// Switch and resource-pool records cannot share one table
    MixedTabular,
}

#[derive(Debug, Clone)]
pub struct DocumentError {
    pub kind: DocumentErrorKind,
    pub message: String,
}

impl DocumentError {
    pub fn new(kind: DocumentErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for DocumentError {}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        Self::new(DocumentErrorKind::Io, e.to_string())
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(DocumentErrorKind::Json, e.to_string())
    }
}

impl From<csv::Error> for DocumentError {
    fn from(e: csv::Error) -> Self {
        Self::new(DocumentErrorKind::Csv, e.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
