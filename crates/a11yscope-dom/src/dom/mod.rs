//! Reconstructed accessibility DOM tree.
//!
//! A [`DomNode`] tree is captured once per scan, either deserialized from
//! the scanner's snapshot or rebuilt here from a raw CDP document dump by
//! [`CaptureBuilder`]. Capture enforces the size bounds:
//!
//! - depth is capped (25 levels by default) and deeper elements dropped
//! - each node keeps at most 200 element children by default
//! - script, style and other non-content tags never become nodes
//! - `class`, inline `style` and framework-internal attributes are dropped
//!
//! Everything downstream treats the tree as immutable.

mod capture;
mod dom_node;
mod tab_order;

pub use capture::{truncate_snippet, CaptureBuilder, CaptureLimits, CaptureStats, RawElement};
pub use dom_node::{DomNode, DomNodeIter};
pub use tab_order::{tab_sequence, TabStop};

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
