//! Filter Engine.
//!
//! Everything here derives from one per-node predicate, [`matches`], so
//! the pruned tree, the flat hit list and the option feasibility flags
//! always agree.
//!
//! An inactive filter state (no roles, no aria attributes, association
//! off, blank keyword) short-circuits: the tree is shown unfiltered and
//! nothing counts as a hit.

mod engine;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dom::DomNode;
use crate::relationships::AriaRelationshipsMap;

pub use engine::{FilterEngine, FilterOption, FilterOptions, FilteredView, MatchedNode};

/// User-selected query state. Clauses combine with AND; values inside
/// `roles` and `aria_attrs` combine with OR.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomTreeFilters {
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub aria_attrs: BTreeSet<String>,
    #[serde(default)]
    pub association_id: bool,
    #[serde(default)]
    pub keyword: String,
}

impl DomTreeFilters {
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_aria_attr(mut self, attr: impl Into<String>) -> Self {
        self.aria_attrs.insert(attr.into());
        self
    }

    pub fn with_association(mut self) -> Self {
        self.association_id = true;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Whether any clause constrains the tree.
    pub fn is_active(&self) -> bool {
        !self.roles.is_empty()
            || !self.aria_attrs.is_empty()
            || self.association_id
            || !self.keyword.trim().is_empty()
    }

    /// Copy with `candidate` isolated as the only value of `dimension`,
    /// other dimensions unchanged.
    pub fn isolate(&self, dimension: FilterDimension, candidate: &str) -> Self {
        let mut hypothetical = self.clone();
        match dimension {
            FilterDimension::Role => {
                hypothetical.roles = BTreeSet::from([candidate.to_string()]);
            }
            FilterDimension::AriaAttr => {
                hypothetical.aria_attrs = BTreeSet::from([candidate.to_string()]);
            }
            FilterDimension::Association => hypothetical.association_id = true,
            FilterDimension::Keyword => hypothetical.keyword = candidate.to_string(),
        }
        hypothetical
    }
}

/// One of the four filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Role,
    AriaAttr,
    Association,
    Keyword,
}

/// A clause that fired for a node, used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchClause {
    Role,
    AriaAttr,
    Association,
    Keyword,
}

fn role_clause(node: &DomNode, filters: &DomTreeFilters) -> bool {
    node.role().is_some_and(|role| filters.roles.contains(role))
}

fn aria_clause(node: &DomNode, filters: &DomTreeFilters) -> bool {
    node.aria_attribute_names()
        .any(|name| filters.aria_attrs.contains(name))
}

fn association_clause(node: &DomNode, relationships: &AriaRelationshipsMap) -> bool {
    relationships.is_associated(node)
}

fn keyword_clause(node: &DomNode, needle: &str) -> bool {
    let mut haystack = format!(
        "{} {} {}",
        node.tag_name,
        node.selector,
        node.text_snippet.as_deref().unwrap_or_default()
    );
    for (name, value) in &node.attributes {
        haystack.push(' ');
        haystack.push_str(name);
        haystack.push(' ');
        haystack.push_str(value);
    }
    haystack.to_lowercase().contains(needle)
}

fn normalized_keyword(filters: &DomTreeFilters) -> String {
    filters.keyword.trim().to_lowercase()
}

/// Whether `node` itself satisfies every active clause.
///
/// Always `false` for an inactive filter state.
pub fn matches(node: &DomNode, filters: &DomTreeFilters, relationships: &AriaRelationshipsMap) -> bool {
    if !filters.is_active() {
        return false;
    }
    matches_with_keyword(node, filters, relationships, &normalized_keyword(filters))
}

/// [`matches`] with the keyword already trimmed and lowercased, so tree
/// walks normalize it once.
pub(crate) fn matches_with_keyword(
    node: &DomNode,
    filters: &DomTreeFilters,
    relationships: &AriaRelationshipsMap,
    keyword: &str,
) -> bool {
    (filters.roles.is_empty() || role_clause(node, filters))
        && (filters.aria_attrs.is_empty() || aria_clause(node, filters))
        && (!filters.association_id || association_clause(node, relationships))
        && (keyword.is_empty() || keyword_clause(node, keyword))
}

/// Active clauses that fire for `node`, independently of each other.
pub fn match_info(
    node: &DomNode,
    filters: &DomTreeFilters,
    relationships: &AriaRelationshipsMap,
) -> BTreeSet<MatchClause> {
    let mut fired = BTreeSet::new();
    if !filters.roles.is_empty() && role_clause(node, filters) {
        fired.insert(MatchClause::Role);
    }
    if !filters.aria_attrs.is_empty() && aria_clause(node, filters) {
        fired.insert(MatchClause::AriaAttr);
    }
    if filters.association_id && association_clause(node, relationships) {
        fired.insert(MatchClause::Association);
    }
    let keyword = normalized_keyword(filters);
    if !keyword.is_empty() && keyword_clause(node, &keyword) {
        fired.insert(MatchClause::Keyword);
    }
    fired
}

/// Prune `node` to the paths leading to matches.
///
/// A matching node keeps its original, unpruned children. A non-matching
/// node survives only with the children that survived. Inactive filters
/// return the whole tree.
pub fn prune(
    node: &DomNode,
    filters: &DomTreeFilters,
    relationships: &AriaRelationshipsMap,
) -> Option<DomNode> {
    if !filters.is_active() {
        return Some(node.clone());
    }
    prune_active(node, filters, relationships, &normalized_keyword(filters))
}

fn prune_active(
    node: &DomNode,
    filters: &DomTreeFilters,
    relationships: &AriaRelationshipsMap,
    keyword: &str,
) -> Option<DomNode> {
    if matches_with_keyword(node, filters, relationships, keyword) {
        return Some(node.clone());
    }
    let children: Vec<DomNode> = node
        .children
        .iter()
        .filter_map(|child| prune_active(child, filters, relationships, keyword))
        .collect();
    if children.is_empty() {
        return None;
    }
    Some(DomNode {
        tag_name: node.tag_name.clone(),
        selector: node.selector.clone(),
        attributes: node.attributes.clone(),
        text_snippet: node.text_snippet.clone(),
        children,
    })
}

/// Every node in `root` (pre-order) that matches on its own.
pub fn collect_matches<'a>(
    root: &'a DomNode,
    filters: &DomTreeFilters,
    relationships: &AriaRelationshipsMap,
) -> Vec<&'a DomNode> {
    if !filters.is_active() {
        return Vec::new();
    }
    let keyword = normalized_keyword(filters);
    root.iter()
        .filter(|node| matches_with_keyword(node, filters, relationships, &keyword))
        .collect()
}

/// Whether selecting `candidate` in `dimension` could yield any match
/// given the other dimensions of `current`.
pub fn would_produce_matches(
    candidate: &str,
    dimension: FilterDimension,
    current: &DomTreeFilters,
    root: Option<&DomNode>,
    relationships: &AriaRelationshipsMap,
) -> bool {
    let Some(root) = root else {
        return false;
    };
    let hypothetical = current.isolate(dimension, candidate);
    if !hypothetical.is_active() {
        return false;
    }
    let keyword = normalized_keyword(&hypothetical);
    root.iter()
        .any(|node| matches_with_keyword(node, &hypothetical, relationships, &keyword))
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
