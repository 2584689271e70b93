//! ARIA relationship resolution.
//!
//! Two passes over the tree: the first indexes every node carrying an id,
//! the second collects `aria-labelledby`, `aria-describedby`,
//! `aria-controls` and `aria-haspopup` edges and validates the ones where a
//! role check is meaningful. The incoming-reference map is the transpose of
//! the outgoing edge lists.

mod validation;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::DomNode;

/// Kind of ARIA cross-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Labelledby,
    Describedby,
    Controls,
    Haspopup,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Labelledby,
        RelationshipType::Describedby,
        RelationshipType::Controls,
        RelationshipType::Haspopup,
    ];

    /// Attribute that declares this relationship.
    pub fn attribute(self) -> &'static str {
        match self {
            RelationshipType::Labelledby => "aria-labelledby",
            RelationshipType::Describedby => "aria-describedby",
            RelationshipType::Controls => "aria-controls",
            RelationshipType::Haspopup => "aria-haspopup",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipType::Labelledby => "labelledby",
            RelationshipType::Describedby => "describedby",
            RelationshipType::Controls => "controls",
            RelationshipType::Haspopup => "haspopup",
        };
        f.write_str(name)
    }
}

/// Role-correctness findings for a `controls` or `haspopup` edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AriaRelationshipValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_matches: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_child_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_have_expected_child_role: Option<bool>,
    pub details: String,
}

/// A directed edge from a referencing node to the ids it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AriaRelationship {
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub source_selector: String,
    pub target_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<AriaRelationshipValidation>,
}

/// Incoming reference to an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingReference {
    pub selector: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
}

/// The resolved relationship graph of one tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AriaRelationshipsMap {
    pub id_to_selector: BTreeMap<String, String>,
    pub selector_to_relationships: BTreeMap<String, Vec<AriaRelationship>>,
    pub id_to_references: BTreeMap<String, Vec<IncomingReference>>,
}

impl AriaRelationshipsMap {
    /// Resolve the relationships of `root`. `None` yields empty maps.
    pub fn build(root: Option<&DomNode>) -> Self {
        RelationshipResolver::resolve(root)
    }

    /// Outgoing edges declared by the node at `selector`.
    pub fn relationships_for(&self, selector: &str) -> &[AriaRelationship] {
        self.selector_to_relationships
            .get(selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Incoming references to `id`.
    pub fn references_to(&self, id: &str) -> &[IncomingReference] {
        self.id_to_references
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `node` takes part in any relationship, as source or target.
    pub fn is_associated(&self, node: &DomNode) -> bool {
        !self.relationships_for(&node.selector).is_empty()
            || node.id().is_some_and(|id| !self.references_to(id).is_empty())
    }

    /// All edges, grouped by source selector.
    pub fn relationships(&self) -> impl Iterator<Item = &AriaRelationship> {
        self.selector_to_relationships.values().flatten()
    }

    /// Edges carrying validation findings.
    pub fn invalid_relationships(&self) -> impl Iterator<Item = &AriaRelationship> {
        self.relationships().filter(|r| r.validation.is_some())
    }

    pub fn relationship_count(&self) -> usize {
        self.selector_to_relationships.values().map(Vec::len).sum()
    }

    /// Ids referenced by some edge but carried by no node.
    pub fn dangling_ids(&self) -> Vec<&str> {
        self.id_to_references
            .keys()
            .filter(|id| !self.id_to_selector.contains_key(*id))
            .map(String::as_str)
            .collect()
    }
}

/// Builds an [`AriaRelationshipsMap`] from a tree.
pub struct RelationshipResolver<'a> {
    id_to_node: HashMap<&'a str, &'a DomNode>,
}

impl<'a> RelationshipResolver<'a> {
    /// Run both passes over `root`.
    pub fn resolve(root: Option<&'a DomNode>) -> AriaRelationshipsMap {
        let Some(root) = root else {
            return AriaRelationshipsMap::default();
        };

        let mut map = AriaRelationshipsMap::default();
        let mut resolver = RelationshipResolver {
            id_to_node: HashMap::new(),
        };

        // Pass 1: ids. Later duplicates overwrite earlier ones.
        for node in root.iter() {
            if let Some(id) = node.id() {
                map.id_to_selector.insert(id.to_string(), node.selector.clone());
                resolver.id_to_node.insert(id, node);
            }
        }

        // Pass 2: edges.
        for node in root.iter() {
            let edges = resolver.collect_edges(node);
            if edges.is_empty() {
                continue;
            }
            for edge in &edges {
                for target in &edge.target_ids {
                    map.id_to_references
                        .entry(target.clone())
                        .or_default()
                        .push(IncomingReference {
                            selector: edge.source_selector.clone(),
                            kind: edge.kind,
                        });
                }
            }
            map.selector_to_relationships
                .entry(node.selector.clone())
                .or_default()
                .extend(edges);
        }

        debug!(
            ids = map.id_to_selector.len(),
            relationships = map.relationship_count(),
            referenced_ids = map.id_to_references.len(),
            "ARIA relationships resolved"
        );
        map
    }

    fn node_for_id(&self, id: &str) -> Option<&'a DomNode> {
        self.id_to_node.get(id).copied()
    }

    fn collect_edges(&self, node: &DomNode) -> Vec<AriaRelationship> {
        let mut edges = Vec::new();
        let controls = node.non_blank_attr("aria-controls").map(split_id_list);

        for kind in [
            RelationshipType::Labelledby,
            RelationshipType::Describedby,
            RelationshipType::Controls,
        ] {
            let Some(value) = node.non_blank_attr(kind.attribute()) else {
                continue;
            };
            let target_ids = split_id_list(value);
            let validation = match kind {
                RelationshipType::Controls => self.validate_controls(node, &target_ids),
                _ => None,
            };
            edges.push(AriaRelationship {
                kind,
                source_selector: node.selector.clone(),
                target_ids,
                popup_type: None,
                validation,
            });
        }

        if let Some(popup) = node.non_blank_attr("aria-haspopup") {
            let popup = popup.to_ascii_lowercase();
            let target_ids = controls.clone().unwrap_or_default();
            let validation = match controls {
                Some(ref ids) => self.validate_popup(&popup, ids),
                None => None,
            };
            edges.push(AriaRelationship {
                kind: RelationshipType::Haspopup,
                source_selector: node.selector.clone(),
                target_ids,
                popup_type: Some(popup),
                validation,
            });
        }

        edges
    }
}

/// Split a whitespace-separated id reference list, dropping empty tokens.
pub fn split_id_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "relationships_tests.rs"]
mod tests;
