//! `analyze` and `relationships` subcommand handlers.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use a11yscope_config::Config;
use a11yscope_dom::dom::tab_sequence;
use a11yscope_dom::violations::parse_violations;
use a11yscope_dom::{
    AriaRelationship, AriaRelationshipsMap, DomAnalysis, SnapshotNormalizer, TabStop, Violation,
    ViolationSummary, ViolationTargetMap,
};

use crate::cmd_capture::capture_limits;
use crate::output::{load_scan, print_json};

/// Everything `analyze` prints.
#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeReport {
    pub analysis: DomAnalysis,
    pub relationships: AriaRelationshipsMap,
    pub tab_sequence: Vec<TabStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_targets: Option<ViolationTargetMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_summary: Option<ViolationSummary>,
}

impl AnalyzeReport {
    pub(crate) fn build(analysis: DomAnalysis, violations: Option<&[Violation]>) -> Self {
        let relationships = AriaRelationshipsMap::build(analysis.dom_tree.as_ref());
        let tab_sequence = analysis
            .dom_tree
            .as_ref()
            .map(tab_sequence)
            .unwrap_or_default();
        Self {
            relationships,
            tab_sequence,
            violation_targets: violations.map(ViolationTargetMap::from_violations),
            violation_summary: violations.map(ViolationSummary::from_violations),
            analysis,
        }
    }
}

/// Handle `analyze`.
pub(crate) fn analyze(
    config: &Config,
    snapshot: &Path,
    violations_file: Option<&Path>,
) -> anyhow::Result<()> {
    let input = load_scan(config, snapshot)?;
    let violations = match violations_file {
        Some(path) => Some(load_violations(path)?),
        None => input.violations,
    };

    let analysis =
        SnapshotNormalizer::normalize_with_limits(input.capture, &capture_limits(&config.capture));
    let report = AnalyzeReport::build(analysis, violations.as_deref());

    info!(
        nodes = report.analysis.summary.total_nodes,
        relationships = report.relationships.relationship_count(),
        flagged = report.violation_targets.as_ref().map_or(0, ViolationTargetMap::len),
        "Analysis complete"
    );
    print_json(config, &report)
}

/// Handle `relationships`.
pub(crate) fn relationships(
    config: &Config,
    snapshot: &Path,
    invalid_only: bool,
) -> anyhow::Result<()> {
    let input = load_scan(config, snapshot)?;
    let map = AriaRelationshipsMap::build(input.capture.dom_tree.as_ref());
    let selected = select_relationships(&map, invalid_only);

    info!(
        total = map.relationship_count(),
        shown = selected.len(),
        "Relationships resolved"
    );
    print_json(config, &selected)
}

fn select_relationships(map: &AriaRelationshipsMap, invalid_only: bool) -> Vec<&AriaRelationship> {
    if invalid_only {
        map.invalid_relationships().collect()
    } else {
        map.relationships().collect()
    }
}

/// A violations file holds either a bare list or a scan result with a
/// `violations` field.
fn load_violations(path: &Path) -> anyhow::Result<Vec<Violation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading violations {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing violations {}", path.display()))?;
    Ok(match value.get("violations") {
        Some(list) => parse_violations(list),
        None => parse_violations(&value),
    })
}
