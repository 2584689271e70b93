//! Raw capture produced by the page scanner, parsed leniently.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::dom::{CaptureLimits, DomNode};
use crate::error::SnapshotError;
use crate::violations::{parse_violations, Violation};

/// Heading as captured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    #[serde(deserialize_with = "lenient_level")]
    pub level: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

/// Landmark region as captured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

/// Element carrying an explicit `role`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleEntry {
    #[serde(default)]
    pub element: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

/// Form control as captured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormControl {
    #[serde(rename = "type", default)]
    pub control_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Focusable element as captured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusableEntry {
    #[serde(default)]
    pub tab_order: i64,
    #[serde(default)]
    pub element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_tabindex",
        skip_serializing_if = "Option::is_none"
    )]
    pub tabindex: Option<i64>,
}

/// Raw capture: parallel flat lists plus the DOM tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCapture {
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
    #[serde(default)]
    pub forms: Vec<FormControl>,
    #[serde(default)]
    pub focusable: Vec<FocusableEntry>,
    #[serde(default)]
    pub dom_tree: Option<DomNode>,
}

impl RawCapture {
    /// Parse a capture without ever failing, bounding `domTree` with the
    /// default [`CaptureLimits`].
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_with_limits(value, &CaptureLimits::default())
    }

    /// Parse a capture without ever failing.
    ///
    /// Absent or malformed lists become empty, malformed entries are
    /// dropped one by one, and a malformed `domTree` becomes `None`. A
    /// well-formed `domTree` is cut back to the depth and child caps.
    pub fn from_value_with_limits(value: &Value, limits: &CaptureLimits) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                warn!("Raw capture is not an object, treating as empty");
            }
            return Self::default();
        };

        let dom_tree = match obj.get("domTree") {
            None | Some(Value::Null) => None,
            Some(tree) => match DomNode::deserialize(tree) {
                Ok(node) => Some(node.bounded(limits).0),
                Err(e) => {
                    warn!(error = %e, "Malformed domTree, ignoring");
                    None
                }
            },
        };

        Self {
            headings: lenient_list(obj.get("headings"), "headings"),
            landmarks: lenient_list(obj.get("landmarks"), "landmarks"),
            roles: lenient_list(obj.get("roles"), "roles"),
            forms: lenient_list(obj.get("forms"), "forms"),
            focusable: lenient_list(obj.get("focusable"), "focusable"),
            dom_tree,
        }
    }

    /// Parse from JSON text. Fails only on invalid JSON syntax.
    pub fn from_json_str(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }
}

/// One scan's worth of input: the capture and, when present, the rule
/// engine's violations.
#[derive(Debug, Clone, Default)]
pub struct ScanInput {
    pub capture: RawCapture,
    pub violations: Option<Vec<Violation>>,
}

impl ScanInput {
    /// Accept either a bare capture object or a scan-result envelope
    /// `{ "domAnalysis": {...}, "violations": [...] }`.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_with_limits(value, &CaptureLimits::default())
    }

    pub fn from_value_with_limits(value: &Value, limits: &CaptureLimits) -> Self {
        match value.get("domAnalysis") {
            Some(capture) => Self {
                capture: RawCapture::from_value_with_limits(capture, limits),
                violations: value.get("violations").map(parse_violations),
            },
            None => Self {
                capture: RawCapture::from_value_with_limits(value, limits),
                violations: None,
            },
        }
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        Self::load_with_limits(path, &CaptureLimits::default())
    }

    pub fn load_with_limits(path: &Path, limits: &CaptureLimits) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(Self::from_value_with_limits(&value, limits))
    }
}

/// Parse a JSON array item by item, dropping entries that do not fit `T`.
pub(crate) fn lenient_list<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(field, "Expected a list, treating as empty");
            return Vec::new();
        }
    };

    let mut dropped = 0usize;
    let parsed: Vec<T> = items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(v) => Some(v),
            Err(_) => {
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!(field, dropped, "Dropped malformed capture entries");
    }
    parsed
}

/// Accepts `3`, `"3"`, `null` or garbage (which becomes `None`).
fn lenient_tabindex<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts `2`, `2.0` and `"2"`. Anything else, or a value outside `u8`,
/// is an error so the heading is dropped.
fn lenient_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let level = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    level
        .and_then(|l| u8::try_from(l).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid heading level: {}", value)))
}
