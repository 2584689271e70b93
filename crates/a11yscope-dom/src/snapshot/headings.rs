//! Heading hierarchy validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Outcome of scanning heading levels in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingHierarchy {
    pub missing_h1: bool,
    /// Intermediate levels jumped over, ascending.
    pub skipped_levels: Vec<u8>,
    pub valid: bool,
}

/// Validate heading levels given in document order.
///
/// A level is skipped when a heading exceeds the running maximum level by
/// more than one. The first heading sets the baseline, so a document that
/// starts at `h2` reports `missing_h1` rather than a skipped level 1.
/// Levels outside `1..=6` are ignored.
pub fn validate_heading_levels(levels: impl IntoIterator<Item = u8>) -> HeadingHierarchy {
    let mut skipped = BTreeSet::new();
    let mut max_seen: Option<u8> = None;
    let mut has_h1 = false;

    for level in levels.into_iter().filter(|l| (1..=6).contains(l)) {
        has_h1 |= level == 1;
        match max_seen {
            None => max_seen = Some(level),
            Some(max) => {
                if level > max + 1 {
                    skipped.extend(max + 1..level);
                }
                max_seen = Some(max.max(level));
            }
        }
    }

    let missing_h1 = !has_h1;
    HeadingHierarchy {
        missing_h1,
        valid: !missing_h1 && skipped.is_empty(),
        skipped_levels: skipped.into_iter().collect(),
    }
}
