//! FilterEngine: the filter operations bound to one tree and its
//! relationship map.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    collect_matches, match_info, matches, prune, would_produce_matches, DomTreeFilters,
    FilterDimension, MatchClause,
};
use crate::dom::DomNode;
use crate::relationships::AriaRelationshipsMap;

/// A hit in the flat match list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedNode {
    pub selector: String,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_snippet: Option<String>,
    pub clauses: BTreeSet<MatchClause>,
}

/// Pruned tree plus hit list for one filter state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub active: bool,
    pub tree: Option<DomNode>,
    pub matches: Vec<MatchedNode>,
    pub match_count: usize,
}

/// A selectable filter value and whether it could yield a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
    pub available: bool,
}

/// Feasibility of every option under the current filter state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub roles: Vec<FilterOption>,
    pub aria_attrs: Vec<FilterOption>,
    pub association_available: bool,
}

/// Filter operations over one tree.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    root: Option<&'a DomNode>,
    relationships: &'a AriaRelationshipsMap,
}

impl<'a> FilterEngine<'a> {
    pub fn new(root: Option<&'a DomNode>, relationships: &'a AriaRelationshipsMap) -> Self {
        Self {
            root,
            relationships,
        }
    }

    pub fn matches(&self, node: &DomNode, filters: &DomTreeFilters) -> bool {
        matches(node, filters, self.relationships)
    }

    pub fn match_info(&self, node: &DomNode, filters: &DomTreeFilters) -> BTreeSet<MatchClause> {
        match_info(node, filters, self.relationships)
    }

    pub fn prune(&self, filters: &DomTreeFilters) -> Option<DomNode> {
        prune(self.root?, filters, self.relationships)
    }

    pub fn collect_matches(&self, filters: &DomTreeFilters) -> Vec<&'a DomNode> {
        match self.root {
            Some(root) => collect_matches(root, filters, self.relationships),
            None => Vec::new(),
        }
    }

    pub fn would_produce_matches(
        &self,
        candidate: &str,
        dimension: FilterDimension,
        filters: &DomTreeFilters,
    ) -> bool {
        would_produce_matches(candidate, dimension, filters, self.root, self.relationships)
    }

    /// Pruned tree and hit list together.
    pub fn apply(&self, filters: &DomTreeFilters) -> FilteredView {
        let active = filters.is_active();
        let tree = self.prune(filters);
        let matches: Vec<MatchedNode> = self
            .collect_matches(filters)
            .into_iter()
            .map(|node| MatchedNode {
                selector: node.selector.clone(),
                tag_name: node.tag_name.clone(),
                text_snippet: node.text_snippet.clone(),
                clauses: self.match_info(node, filters),
            })
            .collect();

        debug!(
            active,
            matches = matches.len(),
            kept_nodes = tree.as_ref().map_or(0, DomNode::node_count),
            "Filters applied"
        );

        FilteredView {
            active,
            tree,
            match_count: matches.len(),
            matches,
        }
    }

    /// Distinct `role` values in the tree, sorted.
    pub fn available_roles(&self) -> Vec<String> {
        self.distinct(|node, out| {
            if let Some(role) = node.role() {
                out.insert(role.to_string());
            }
        })
    }

    /// Distinct `aria-*` attribute names in the tree, sorted.
    pub fn available_aria_attrs(&self) -> Vec<String> {
        self.distinct(|node, out| {
            out.extend(node.aria_attribute_names().map(str::to_string));
        })
    }

    fn distinct(&self, mut collect: impl FnMut(&DomNode, &mut BTreeSet<String>)) -> Vec<String> {
        let mut out = BTreeSet::new();
        if let Some(root) = self.root {
            for node in root.iter() {
                collect(node, &mut out);
            }
        }
        out.into_iter().collect()
    }

    /// Feasibility flag for every option present in the tree.
    pub fn option_availability(&self, filters: &DomTreeFilters) -> FilterOptions {
        let options = |values: Vec<String>,
                       dimension: FilterDimension,
                       selected: &BTreeSet<String>|
         -> Vec<FilterOption> {
            values
                .into_iter()
                .map(|value| FilterOption {
                    available: self.would_produce_matches(&value, dimension, filters),
                    selected: selected.contains(&value),
                    value,
                })
                .collect()
        };

        FilterOptions {
            roles: options(self.available_roles(), FilterDimension::Role, &filters.roles),
            aria_attrs: options(
                self.available_aria_attrs(),
                FilterDimension::AriaAttr,
                &filters.aria_attrs,
            ),
            association_available: self.would_produce_matches(
                "",
                FilterDimension::Association,
                filters,
            ),
        }
    }
}
