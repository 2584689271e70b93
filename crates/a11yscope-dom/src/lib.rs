//! # a11yscope DOM
//!
//! Core analysis over an already captured page snapshot:
//!
//! - [`snapshot`] normalizes the scanner's raw capture into a [`DomAnalysis`]
//!   with screen-reader announcements and heading checks
//! - [`relationships`] resolves ARIA id references into a graph and its transpose
//! - [`filter`] prunes the tree to filter matches while keeping their ancestors
//! - [`violations`] indexes rule-engine violations by target selector
//!
//! ## Usage
//!
//! ```ignore
//! use a11yscope_dom::{AriaRelationshipsMap, DomTreeFilters, FilterEngine, ScanInput, SnapshotNormalizer};
//!
//! let input = ScanInput::load(path)?;
//! let analysis = SnapshotNormalizer::normalize(input.capture);
//! let relationships = AriaRelationshipsMap::build(analysis.dom_tree.as_ref());
//! let engine = FilterEngine::new(analysis.dom_tree.as_ref(), &relationships);
//! let view = engine.apply(&DomTreeFilters::default().with_role("navigation"));
//! ```

pub mod dom;
pub mod error;
pub mod filter;
pub mod relationships;
pub mod snapshot;
pub mod violations;

pub use dom::{CaptureBuilder, CaptureLimits, CaptureStats, DomNode, RawElement, TabStop};
pub use error::SnapshotError;
pub use filter::{
    DomTreeFilters, FilterDimension, FilterEngine, FilterOption, FilterOptions, FilteredView,
    MatchClause, MatchedNode,
};
pub use relationships::{AriaRelationship, AriaRelationshipsMap, RelationshipType};
pub use snapshot::{DomAnalysis, DomSummary, RawCapture, ScanInput, SnapshotNormalizer};
pub use violations::{Violation, ViolationSummary, ViolationTargetInfo, ViolationTargetMap};
