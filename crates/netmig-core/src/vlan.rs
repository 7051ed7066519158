//! VLAN classification policy.
//!
//! The management API exposes a port group's VLAN setting through several
//! loosely-typed candidate fields. [`resolve_vlan`] is the one place that
//! decides which of them wins:
//!
//! 1. an explicit VLAN id,
//! 2. a private-VLAN id,
//! 3. a VLAN range (the first range classifies; later ones are kept aside),
//! 4. otherwise `None`.
//!
//! An id of `0` is the API's "untagged" value and counts as absent.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest usable 802.1Q id.
pub const MAX_VLAN_ID: u16 = 4094;

/// Standard-switch id meaning "guest tagging, every VLAN".
pub const GUEST_TAGGING_ID: u16 = 4095;

/// Exactly one of these applies to a port group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "vlanType")]
pub enum VlanClassification {
    None,
    #[serde(rename = "VLAN")]
    Vlan {
        #[serde(rename = "vlanId")]
        id: u16,
    },
    #[serde(rename = "PVLAN")]
    Pvlan {
        #[serde(rename = "pvlanId")]
        id: u16,
    },
    #[serde(rename = "VLANRange")]
    Range { start: u16, end: u16 },
}

impl VlanClassification {
    /// Rendered tag, as it appears in both output formats.
    pub fn vlan_type(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Vlan { .. } => "VLAN",
            Self::Pvlan { .. } => "PVLAN",
            Self::Range { .. } => "VLANRange",
        }
    }
}

impl Default for VlanClassification {
    fn default() -> Self { Self::None }
}

/// Inclusive VLAN range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRange {
    pub start: u16,
    pub end: u16,
}

impl VlanRange {
    pub fn new(start: u16, end: u16) -> Result<Self, VlanError> {
        if start > end {
            return Err(VlanError::new(
                "vlanRange",
                format!("range start {start} is greater than end {end}"),
            ));
        }
        if end > MAX_VLAN_ID {
            return Err(VlanError::new(
                "vlanRange",
                format!("range end {end} exceeds {MAX_VLAN_ID}"),
            ));
        }
        Ok(Self { start, end })
    }
}

/// Raw candidate fields, exactly as the source exposed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanFields {
    #[serde(default)]
    pub vlan_id: Option<Value>,
    #[serde(default)]
    pub pvlan_id: Option<Value>,
    #[serde(default)]
    pub vlan_range: Option<Value>,
}

impl VlanFields {
    pub fn vlan(id: impl Into<Value>) -> Self {
        Self { vlan_id: Some(id.into()), ..Self::default() }
    }

    pub fn pvlan(id: impl Into<Value>) -> Self {
        Self { pvlan_id: Some(id.into()), ..Self::default() }
    }

    pub fn range(ranges: Value) -> Self {
        Self { vlan_range: Some(ranges), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanResolution {
    pub classification: VlanClassification,
    /// Ranges after the first, in source order. Empty unless the
    /// classification is `Range`.
    pub additional_ranges: Vec<VlanRange>,
}

impl VlanResolution {
    fn single(classification: VlanClassification) -> Self {
        Self { classification, additional_ranges: Vec::new() }
    }
}

/// A candidate field was present but unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanError {
    pub field: &'static str,
    pub reason: String,
}

impl VlanError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

impl fmt::Display for VlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for VlanError {}

/// Apply the precedence policy to one port group's candidate fields.
pub fn resolve_vlan(fields: &VlanFields) -> Result<VlanResolution, VlanError> {
    if let Some(id) = parse_id(fields.vlan_id.as_ref(), "vlanId", GUEST_TAGGING_ID)? {
        if id == GUEST_TAGGING_ID {
            return Ok(VlanResolution::single(VlanClassification::Range {
                start: 0,
                end: MAX_VLAN_ID,
            }));
        }
        return Ok(VlanResolution::single(VlanClassification::Vlan { id }));
    }

    if let Some(id) = parse_id(fields.pvlan_id.as_ref(), "pvlanId", MAX_VLAN_ID)? {
        return Ok(VlanResolution::single(VlanClassification::Pvlan { id }));
    }

    let mut ranges = parse_ranges(fields.vlan_range.as_ref())?.into_iter();
    match ranges.next() {
        Some(first) => Ok(VlanResolution {
            classification: VlanClassification::Range {
                start: first.start,
                end: first.end,
            },
            additional_ranges: ranges.collect(),
        }),
        None => Ok(VlanResolution::single(VlanClassification::None)),
    }
}

fn parse_id(value: Option<&Value>, field: &'static str, max: u16) -> Result<Option<u16>, VlanError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => as_integer(v).ok_or_else(|| VlanError::new(field, format!("expected an integer, got {v}")))?,
    };
    if raw == 0 {
        return Ok(None);
    }
    if raw > u64::from(max) {
        return Err(VlanError::new(field, format!("{raw} is outside 1..={max}")));
    }
    Ok(Some(raw as u16))
}

fn parse_ranges(value: Option<&Value>) -> Result<Vec<VlanRange>, VlanError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(obj @ Value::Object(_)) => Ok(vec![parse_range(obj)?]),
        Some(Value::Array(items)) => items.iter().map(parse_range).collect(),
        Some(other) => Err(VlanError::new(
            "vlanRange",
            format!("expected a range object or array, got {other}"),
        )),
    }
}

fn parse_range(value: &Value) -> Result<VlanRange, VlanError> {
    let bound = |lower: &str, upper: &str| -> Result<u16, VlanError> {
        let v = value
            .get(lower)
            .or_else(|| value.get(upper))
            .ok_or_else(|| VlanError::new("vlanRange", format!("missing `{lower}` in {value}")))?;
        let n = as_integer(v)
            .ok_or_else(|| VlanError::new("vlanRange", format!("`{lower}` is not an integer: {v}")))?;
        u16::try_from(n)
            .ok()
            .filter(|n| *n <= MAX_VLAN_ID)
            .ok_or_else(|| VlanError::new("vlanRange", format!("`{lower}` {n} exceeds {MAX_VLAN_ID}")))
    };
    VlanRange::new(bound("start", "Start")?, bound("end", "End")?)
}

/// Non-negative integer, also accepting decimal strings.
fn as_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(fields: VlanFields) -> VlanClassification {
        resolve_vlan(&fields).unwrap().classification
    }

    #[test]
    fn explicit_vlan_id() {
        assert_eq!(classify(VlanFields::vlan(100)), VlanClassification::Vlan { id: 100 });
    }

    #[test]
    fn vlan_id_wins_over_pvlan_and_range() {
        let fields = VlanFields {
            vlan_id: Some(json!(10)),
            pvlan_id: Some(json!(20)),
            vlan_range: Some(json!([{ "start": 1, "end": 5 }])),
        };
        assert_eq!(classify(fields), VlanClassification::Vlan { id: 10 });
    }

    #[test]
    fn pvlan_wins_over_range() {
        let fields = VlanFields {
            vlan_id: None,
            pvlan_id: Some(json!(301)),
            vlan_range: Some(json!([{ "start": 1, "end": 5 }])),
        };
        assert_eq!(classify(fields), VlanClassification::Pvlan { id: 301 });
    }

    #[test]
    fn zero_id_counts_as_absent() {
        let fields = VlanFields {
            vlan_id: Some(json!(0)),
            pvlan_id: Some(json!(0)),
            vlan_range: None,
        };
        assert_eq!(classify(fields), VlanClassification::None);
    }

    #[test]
    fn nothing_present_is_none() {
        assert_eq!(classify(VlanFields::default()), VlanClassification::None);
        assert_eq!(classify(VlanFields::range(json!([]))), VlanClassification::None);
    }

    #[test]
    fn single_range_in_source_casing() {
        let fields = VlanFields::range(json!([{ "Start": 100, "End": 200 }]));
        assert_eq!(classify(fields), VlanClassification::Range { start: 100, end: 200 });
    }

    #[test]
    fn later_ranges_are_kept_aside() {
        let fields = VlanFields::range(json!([
            { "start": 100, "end": 200 },
            { "start": 300, "end": 310 },
        ]));
        let res = resolve_vlan(&fields).unwrap();
        assert_eq!(res.classification, VlanClassification::Range { start: 100, end: 200 });
        assert_eq!(res.additional_ranges, vec![VlanRange { start: 300, end: 310 }]);
    }

    #[test]
    fn guest_tagging_is_full_range() {
        assert_eq!(
            classify(VlanFields::vlan(4095)),
            VlanClassification::Range { start: 0, end: MAX_VLAN_ID }
        );
    }

    #[test]
    fn inverted_range_is_malformed() {
        let err = resolve_vlan(&VlanFields::range(json!({ "start": 200, "end": 100 }))).unwrap_err();
        assert_eq!(err.field, "vlanRange");
    }

    #[test]
    fn non_integer_id_is_malformed() {
        let err = resolve_vlan(&VlanFields::vlan("trunk")).unwrap_err();
        assert_eq!(err.field, "vlanId");
        assert!(resolve_vlan(&VlanFields::pvlan(5000)).is_err());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        assert_eq!(classify(VlanFields::vlan(" 42 ")), VlanClassification::Vlan { id: 42 });
    }

    #[test]
    fn serialized_tag() {
        let json = serde_json::to_value(VlanClassification::Vlan { id: 100 }).unwrap();
        assert_eq!(json, json!({ "vlanType": "VLAN", "vlanId": 100 }));
        let json = serde_json::to_value(VlanClassification::None).unwrap();
        assert_eq!(json, json!({ "vlanType": "None" }));
    }

    #[test]
    fn resolved_ranges_are_ordered() {
        let samples = [
            json!({ "start": 0, "end": 0 }),
            json!([{ "start": 5, "end": 4094 }, { "start": 7, "end": 9 }]),
            json!({ "Start": 1, "End": 2 }),
        ];
        for sample in samples {
            let res = resolve_vlan(&VlanFields::range(sample)).unwrap();
            if let VlanClassification::Range { start, end } = res.classification {
                assert!(start <= end);
            }
            assert!(res.additional_ranges.iter().all(|r| r.start <= r.end));
        }
    }
}
