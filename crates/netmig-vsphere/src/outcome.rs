//! Per-item results: a collector keeps going past one bad switch, host or
//! pool, and reports what it skipped.

use std::fmt;

use serde::Serialize;

use crate::error::VmwareResult;

/// Something that could not be collected, attributed to a named entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWarning {
    /// Switch, host, pool or port group the failure belongs to
    pub entity: String,
    pub reason: String,
}

impl CollectionWarning {
    pub fn new(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        let warning = Self { entity: entity.into(), reason: reason.into() };
        log::warn!("{warning}");
        warning
    }
}

impl fmt::Display for CollectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.reason)
    }
}

/// Result of collecting one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Warning(CollectionWarning),
}

impl<T> Outcome<T> {
    /// Downgrade a failed call to a warning about `entity`.
    pub fn from_result(entity: &str, what: &str, result: VmwareResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Warning(CollectionWarning::new(entity, format!("{what}: {e}"))),
        }
    }
}

/// Records a collector produced plus the warnings it raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub records: Vec<T>,
    pub warnings: Vec<CollectionWarning>,
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self { records: Vec::new(), warnings: Vec::new() }
    }
}

impl<T> Collected<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: Outcome<T>) {
        match outcome {
            Outcome::Ok(record) => self.records.push(record),
            Outcome::Warning(w) => self.warnings.push(w),
        }
    }

    /// Value of a sub-fetch, or an empty default plus a warning.
    pub fn or_empty<U: Default>(&mut self, entity: &str, what: &str, result: VmwareResult<U>) -> U {
        match Outcome::from_result(entity, what, result) {
            Outcome::Ok(value) => value,
            Outcome::Warning(w) => {
                self.warnings.push(w);
                U::default()
            }
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Collected<U> {
        Collected {
            records: self.records.into_iter().map(f).collect(),
            warnings: self.warnings,
        }
    }
}

impl<T> FromIterator<Outcome<T>> for Collected<T> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        let mut collected = Self::new();
        for outcome in iter {
            collected.push(outcome);
        }
        collected
    }
}
