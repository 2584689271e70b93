//! DomNode: one element of the reconstructed accessibility tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One element in the reconstructed accessibility tree.
///
/// Immutable once captured. Filtered views are pruned copies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    /// Tag name (lowercase).
    #[serde(default)]
    pub tag_name: String,

    /// Stable path addressing this node within the captured document.
    #[serde(default)]
    pub selector: String,

    /// Attributes, without presentation-only and framework-internal ones.
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: BTreeMap<String, String>,

    /// Direct text children only, truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_snippet: Option<String>,

    /// Child elements in document order.
    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<DomNode>,
}

impl DomNode {
    /// Create a childless node.
    pub fn new(tag_name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            selector: selector.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_snippet = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Raw attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Trimmed, non-empty `id`.
    pub fn id(&self) -> Option<&str> {
        self.non_blank_attr("id")
    }

    /// Trimmed, non-empty `role`.
    pub fn role(&self) -> Option<&str> {
        self.non_blank_attr("role")
    }

    /// Trimmed attribute value, `None` when absent or blank.
    pub fn non_blank_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Names of the `aria-*` attributes carried by this node.
    pub fn aria_attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .filter(|name| name.starts_with("aria-"))
    }

    /// Pre-order (document order) traversal of this node and its descendants.
    pub fn iter(&self) -> DomNodeIter<'_> {
        DomNodeIter { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels in this subtree (a lone node has depth 1).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }
        max
    }

    /// First node in document order whose selector equals `selector`.
    pub fn find_by_selector(&self, selector: &str) -> Option<&DomNode> {
        self.iter().find(|n| n.selector == selector)
    }
}

/// Explicit-stack pre-order iterator over a [`DomNode`] subtree.
pub struct DomNodeIter<'a> {
    stack: Vec<&'a DomNode>,
}

impl<'a> Iterator for DomNodeIter<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// `null` or a non-object becomes empty; non-string values are dropped
/// one by one.
fn lenient_attributes<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        Value::Null => return Ok(BTreeMap::new()),
        _ => {
            warn!("Node attributes are not an object, treating as empty");
            return Ok(BTreeMap::new());
        }
    };

    let total = map.len();
    let attributes: BTreeMap<String, String> = map
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(v) => Some((name, v)),
            _ => None,
        })
        .collect();
    if attributes.len() < total {
        warn!(dropped = total - attributes.len(), "Dropped non-string node attributes");
    }
    Ok(attributes)
}

/// `null` or a non-list becomes empty; malformed children are dropped one
/// by one.
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<DomNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        _ => {
            warn!("Node children are not a list, treating as empty");
            return Ok(Vec::new());
        }
    };

    let total = items.len();
    let children: Vec<DomNode> = items
        .into_iter()
        .filter_map(|item| DomNode::deserialize(item).ok())
        .collect();
    if children.len() < total {
        warn!(dropped = total - children.len(), "Dropped malformed child nodes");
    }
    Ok(children)
}
