//! Snapshot Normalizer.
//!
//! Turns the scanner's loosely typed capture into a [`DomAnalysis`]: the
//! flat heading/landmark/role/form/focusable projections, each enriched
//! with an announcement, plus the DOM tree and a [`DomSummary`].
//! Normalization is a pure function and never fails.

pub mod announce;
mod headings;
mod raw;

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{CaptureLimits, DomNode};

pub use headings::{validate_heading_levels, HeadingHierarchy};
pub use raw::{FocusableEntry, FormControl, Heading, Landmark, RawCapture, RoleEntry, ScanInput};

pub(crate) use raw::lenient_list;

/// A captured item together with what a screen reader would speak for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announced<T> {
    #[serde(flatten)]
    pub item: T,
    pub announcement: String,
}

impl<T> Deref for Announced<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

pub type HeadingItem = Announced<Heading>;
pub type LandmarkItem = Announced<Landmark>;
pub type RoleItem = Announced<RoleEntry>;
pub type FormItem = Announced<FormControl>;
pub type FocusableElement = Announced<FocusableEntry>;

/// Summary statistics and validity flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomSummary {
    pub total_headings: usize,
    pub total_landmarks: usize,
    pub total_roles: usize,
    pub total_forms: usize,
    pub total_focusable: usize,
    pub total_nodes: usize,
    pub max_depth: usize,
    pub missing_h1: bool,
    pub skipped_heading_levels: Vec<u8>,
    pub heading_hierarchy_valid: bool,
    pub unlabeled_form_controls: usize,
    pub positive_tabindex_count: usize,
    pub has_main_landmark: bool,
    /// Ids carried by more than one tree node, sorted.
    pub duplicate_ids: Vec<String>,
}

/// Normalized analysis record for one scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomAnalysis {
    pub headings: Vec<HeadingItem>,
    pub landmarks: Vec<LandmarkItem>,
    pub roles: Vec<RoleItem>,
    pub forms: Vec<FormItem>,
    /// In tab order.
    pub focusable: Vec<FocusableElement>,
    pub dom_tree: Option<DomNode>,
    pub summary: DomSummary,
}

/// Snapshot normalizer.
pub struct SnapshotNormalizer;

impl SnapshotNormalizer {
    /// Normalize a raw capture under the default [`CaptureLimits`].
    pub fn normalize(raw: RawCapture) -> DomAnalysis {
        Self::normalize_with_limits(raw, &CaptureLimits::default())
    }

    /// Normalize a raw capture, cutting the tree back to `limits` first.
    pub fn normalize_with_limits(raw: RawCapture, limits: &CaptureLimits) -> DomAnalysis {
        let RawCapture {
            headings,
            landmarks,
            roles,
            forms,
            focusable,
            dom_tree,
        } = raw;
        let dom_tree = dom_tree.map(|tree| tree.bounded(limits).0);

        let hierarchy = validate_heading_levels(headings.iter().map(|h| h.level));

        let headings: Vec<HeadingItem> = headings
            .into_iter()
            .map(|h| announced(h, announce::heading))
            .collect();
        let landmarks: Vec<LandmarkItem> = landmarks
            .into_iter()
            .map(|l| announced(l, announce::landmark))
            .collect();
        let roles: Vec<RoleItem> = roles
            .into_iter()
            .map(|r| announced(r, announce::role))
            .collect();
        let forms: Vec<FormItem> = forms
            .into_iter()
            .map(|f| announced(f, announce::form_control))
            .collect();
        let focusable: Vec<FocusableElement> = Self::in_tab_order(focusable)
            .into_iter()
            .map(|f| announced(f, announce::focusable))
            .collect();

        let summary = DomSummary {
            total_headings: headings.len(),
            total_landmarks: landmarks.len(),
            total_roles: roles.len(),
            total_forms: forms.len(),
            total_focusable: focusable.len(),
            total_nodes: dom_tree.as_ref().map_or(0, DomNode::node_count),
            max_depth: dom_tree.as_ref().map_or(0, DomNode::depth),
            missing_h1: hierarchy.missing_h1,
            skipped_heading_levels: hierarchy.skipped_levels,
            heading_hierarchy_valid: hierarchy.valid,
            unlabeled_form_controls: forms.iter().filter(|f| is_unlabeled(f)).count(),
            positive_tabindex_count: focusable
                .iter()
                .filter(|f| f.tabindex.is_some_and(|t| t > 0))
                .count(),
            has_main_landmark: landmarks
                .iter()
                .any(|l| l.role.trim().eq_ignore_ascii_case("main")),
            duplicate_ids: dom_tree.as_ref().map(duplicate_ids).unwrap_or_default(),
        };

        debug!(
            headings = summary.total_headings,
            landmarks = summary.total_landmarks,
            focusable = summary.total_focusable,
            nodes = summary.total_nodes,
            "Snapshot normalized"
        );

        DomAnalysis {
            headings,
            landmarks,
            roles,
            forms,
            focusable,
            dom_tree,
            summary,
        }
    }

    /// Positive tab orders ascending first, then the rest as captured.
    fn in_tab_order(mut focusable: Vec<FocusableEntry>) -> Vec<FocusableEntry> {
        focusable.sort_by_key(|f| {
            if f.tab_order > 0 {
                (0, f.tab_order)
            } else {
                (1, 0)
            }
        });
        focusable
    }
}

fn announced<T>(item: T, announce: fn(&T) -> String) -> Announced<T> {
    let announcement = announce(&item);
    Announced { item, announcement }
}

fn is_unlabeled(form: &FormControl) -> bool {
    let exempt = matches!(
        form.control_type.trim().to_ascii_lowercase().as_str(),
        "hidden" | "submit" | "reset" | "button" | "image"
    );
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    !exempt && blank(&form.label) && blank(&form.aria_label)
}

fn duplicate_ids(root: &DomNode) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in root.iter() {
        if let Some(id) = node.id() {
            *counts.entry(id).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
