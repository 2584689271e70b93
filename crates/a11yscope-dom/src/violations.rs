//! Violation Cross-Reference.
//!
//! The rule engine reports each violation with the selectors of the
//! elements it affected. [`ViolationTargetMap`] folds those into a
//! selector-keyed lookup that the tree view joins against
//! [`DomNode::selector`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dom::DomNode;
use crate::snapshot::lenient_list;

/// An element affected by a violation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationNode {
    #[serde(default)]
    pub html: String,
    /// Selector strings. Nested frame/shadow paths are flattened.
    #[serde(default, deserialize_with = "flatten_targets")]
    pub target: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_summary: Option<String>,
}

/// One rule violation as reported by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<ViolationNode>,
}

impl Violation {
    /// Whether any tag names a WCAG criterion.
    pub fn has_wcag_tag(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_ascii_lowercase().starts_with("wcag"))
    }
}

/// Parse a violation list, dropping entries that are not objects of the
/// expected shape.
pub fn parse_violations(value: &Value) -> Vec<Violation> {
    lenient_list(Some(value), "violations")
}

fn flatten_targets<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn walk(value: Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s),
            Value::Array(items) => items.into_iter().for_each(|item| walk(item, out)),
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(Value::deserialize(deserializer)?, &mut out);
    Ok(out)
}

/// Aggregated violation metadata for one selector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationTargetInfo {
    pub count: usize,
    pub has_wcag: bool,
    pub has_axe: bool,
    /// Distinct violation ids, first-seen order.
    #[serde(default)]
    pub rule_ids: Vec<String>,
}

impl ViolationTargetInfo {
    fn record(&mut self, violation: &Violation, has_wcag: bool) {
        self.count += 1;
        self.has_wcag |= has_wcag;
        self.has_axe = true;
        if !violation.id.is_empty() && !self.rule_ids.contains(&violation.id) {
            self.rule_ids.push(violation.id.clone());
        }
    }
}

/// Selector → aggregated violation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationTargetMap {
    targets: BTreeMap<String, ViolationTargetInfo>,
}

impl ViolationTargetMap {
    /// Explode every affected node's targets into the map. Repeated
    /// occurrences of a selector each add to its count.
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut targets: BTreeMap<String, ViolationTargetInfo> = BTreeMap::new();
        for violation in violations {
            let has_wcag = violation.has_wcag_tag();
            for selector in violation.nodes.iter().flat_map(|n| &n.target) {
                targets
                    .entry(selector.clone())
                    .or_default()
                    .record(violation, has_wcag);
            }
        }
        debug!(
            violations = violations.len(),
            targets = targets.len(),
            "Built violation target map"
        );
        Self { targets }
    }

    pub fn get(&self, selector: &str) -> Option<&ViolationTargetInfo> {
        self.targets.get(selector)
    }

    /// Entry for the node's own selector, if the rule engine flagged it.
    pub fn flagged(&self, node: &DomNode) -> Option<&ViolationTargetInfo> {
        self.get(&node.selector)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ViolationTargetInfo)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Violation totals by impact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    pub total_violations: usize,
    pub affected_nodes: usize,
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub unknown: usize,
}

impl ViolationSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = Self {
            total_violations: violations.len(),
            ..Self::default()
        };
        for violation in violations {
            summary.affected_nodes += violation.nodes.len();
            let bucket = match violation.impact.as_deref().map(str::trim) {
                Some(i) if i.eq_ignore_ascii_case("critical") => &mut summary.critical,
                Some(i) if i.eq_ignore_ascii_case("serious") => &mut summary.serious,
                Some(i) if i.eq_ignore_ascii_case("moderate") => &mut summary.moderate,
                Some(i) if i.eq_ignore_ascii_case("minor") => &mut summary.minor,
                _ => &mut summary.unknown,
            };
            *bucket += 1;
        }
        summary
    }
}
