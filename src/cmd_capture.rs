//! `capture` subcommand handler.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use a11yscope_config::{CaptureConfig, Config};
use a11yscope_dom::{CaptureBuilder, CaptureLimits, CaptureStats, DomNode, RawElement};

use crate::output::print_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptureReport {
    pub dom_tree: Option<DomNode>,
    pub stats: CaptureStats,
}

pub(crate) fn capture_limits(config: &CaptureConfig) -> CaptureLimits {
    CaptureLimits {
        max_depth: config.max_depth,
        max_children: config.max_children,
        text_snippet_limit: config.text_snippet_limit,
        excluded_tags: config.excluded_tags.clone(),
        excluded_attributes: config.excluded_attributes.clone(),
        excluded_attribute_prefixes: config.excluded_attribute_prefixes.clone(),
    }
}

/// Accept the full `DOM.getDocument` result (`{"root": ...}`) or the root
/// node on its own.
pub(crate) fn parse_document(value: Value) -> anyhow::Result<RawElement> {
    let root = match value {
        Value::Object(mut obj) if obj.contains_key("root") => obj.remove("root").unwrap_or_default(),
        other => other,
    };
    serde_json::from_value(root).context("document dump is not a DOM node")
}

/// Handle `capture`.
pub(crate) fn capture(config: &Config, dom: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(dom)
        .with_context(|| format!("reading document dump {}", dom.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing document dump {}", dom.display()))?;
    let document = parse_document(value)?;

    let builder = CaptureBuilder::new(capture_limits(&config.capture));
    let (dom_tree, stats) = builder.build_with_stats(&document);
    if dom_tree.is_none() {
        warn!(path = %dom.display(), "No html element found in document dump");
    }
    info!(
        kept = stats.elements_kept,
        excluded = stats.excluded,
        truncated_depth = stats.truncated_depth,
        truncated_children = stats.truncated_children,
        "Capture built"
    );

    print_json(config, &CaptureReport { dom_tree, stats })
}
