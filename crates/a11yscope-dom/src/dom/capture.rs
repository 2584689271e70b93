//! Builds a bounded [`DomNode`] tree from a raw CDP-style document dump.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DomNode;

const ELEMENT_NODE: i64 = 1;
const TEXT_NODE: i64 = 3;
const DOCUMENT_NODE: i64 = 9;

const ELLIPSIS: &str = "...";

/// Raw DOM node as returned by `DOM.getDocument`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    #[serde(default)]
    pub node_type: i64,
    #[serde(default)]
    pub node_name: String,
    pub local_name: Option<String>,
    pub node_value: Option<String>,
    /// Flattened `[name, value, name, value, ...]`.
    pub attributes: Option<Vec<String>>,
    pub children: Option<Vec<RawElement>>,
}

impl RawElement {
    fn is_element(&self) -> bool {
        self.node_type == ELEMENT_NODE
    }

    fn tag(&self) -> String {
        self.local_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.node_name)
            .to_ascii_lowercase()
    }

    fn children(&self) -> &[RawElement] {
        self.children.as_deref().unwrap_or_default()
    }

    fn attribute_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .as_deref()
            .unwrap_or_default()
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Bounds and exclusions applied while building the tree.
#[derive(Debug, Clone)]
pub struct CaptureLimits {
    pub max_depth: usize,
    pub max_children: usize,
    pub text_snippet_limit: usize,
    pub excluded_tags: Vec<String>,
    pub excluded_attributes: Vec<String>,
    pub excluded_attribute_prefixes: Vec<String>,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_depth: 25,
            max_children: 200,
            text_snippet_limit: 100,
            excluded_tags: [
                "script", "style", "meta", "link", "noscript", "template", "head", "title", "base",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_attributes: vec!["class".to_string(), "style".to_string()],
            excluded_attribute_prefixes: ["data-v-", "data-react", "_ngcontent", "_nghost", "ng-reflect"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CaptureLimits {
    fn is_excluded_tag(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn is_excluded_attribute(&self, name: &str) -> bool {
        self.excluded_attributes.iter().any(|a| a.eq_ignore_ascii_case(name))
            || self
                .excluded_attribute_prefixes
                .iter()
                .any(|p| name.starts_with(p.as_str()))
    }
}

/// Counters collected during one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStats {
    pub elements_seen: usize,
    pub elements_kept: usize,
    /// Excluded elements (their subtrees are not counted).
    pub excluded: usize,
    /// Element children dropped because the depth cap was reached.
    pub truncated_depth: usize,
    /// Element children dropped beyond the per-node child cap.
    pub truncated_children: usize,
}

/// Reconstructs a [`DomNode`] tree under the configured size bounds.
pub struct CaptureBuilder {
    limits: CaptureLimits,
}

impl CaptureBuilder {
    pub fn new(limits: CaptureLimits) -> Self {
        Self { limits }
    }

    /// Build the tree rooted at the document's `html` element.
    pub fn build(&self, document: &RawElement) -> Option<DomNode> {
        self.build_with_stats(document).0
    }

    /// Build the tree and report what was kept, excluded and truncated.
    pub fn build_with_stats(&self, document: &RawElement) -> (Option<DomNode>, CaptureStats) {
        let mut stats = CaptureStats::default();
        let Some(root) = find_root(document) else {
            debug!("No root element in captured document");
            return (None, stats);
        };

        stats.elements_seen += 1;
        let tag = root.tag();
        if self.limits.is_excluded_tag(&tag) {
            stats.excluded += 1;
            return (None, stats);
        }

        let selector = if tag == "html" {
            "html".to_string()
        } else {
            id_selector(root).unwrap_or_else(|| tag.clone())
        };
        // Segments below `html` start a fresh chain.
        let chain = if tag == "html" { String::new() } else { selector.clone() };
        let node = self.build_node(root, tag, selector, &chain, 1, &mut stats);

        if stats.truncated_depth > 0 || stats.truncated_children > 0 {
            warn!(
                truncated_depth = stats.truncated_depth,
                truncated_children = stats.truncated_children,
                "DOM capture truncated at size bounds"
            );
        }
        debug!(
            seen = stats.elements_seen,
            kept = stats.elements_kept,
            excluded = stats.excluded,
            "DOM capture built"
        );
        (Some(node), stats)
    }

    fn build_node(
        &self,
        raw: &RawElement,
        tag: String,
        selector: String,
        chain: &str,
        depth: usize,
        stats: &mut CaptureStats,
    ) -> DomNode {
        stats.elements_kept += 1;

        let attributes: BTreeMap<String, String> = raw
            .attribute_pairs()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .filter(|(name, _)| !self.limits.is_excluded_attribute(name))
            .map(|(name, value)| (name, value.to_string()))
            .collect();

        let mut node = DomNode {
            tag_name: tag,
            selector,
            attributes,
            text_snippet: self.text_snippet(raw),
            children: Vec::new(),
        };

        let elements: Vec<&RawElement> = raw.children().iter().filter(|c| c.is_element()).collect();
        if depth >= self.limits.max_depth {
            stats.truncated_depth += elements.len();
            return node;
        }

        let mut tag_totals: HashMap<String, usize> = HashMap::new();
        for child in &elements {
            *tag_totals.entry(child.tag()).or_default() += 1;
        }

        let mut tag_seen: HashMap<String, usize> = HashMap::new();
        for child in elements {
            let child_tag = child.tag();
            let position = {
                let seen = tag_seen.entry(child_tag.clone()).or_default();
                *seen += 1;
                *seen
            };

            stats.elements_seen += 1;
            if self.limits.is_excluded_tag(&child_tag) {
                stats.excluded += 1;
                continue;
            }
            if node.children.len() >= self.limits.max_children {
                stats.truncated_children += 1;
                continue;
            }

            let child_selector = id_selector(child).unwrap_or_else(|| {
                let segment = if tag_totals.get(&child_tag).copied().unwrap_or(0) > 1 {
                    format!("{}:nth-of-type({})", child_tag, position)
                } else {
                    child_tag.clone()
                };
                if chain.is_empty() {
                    segment
                } else {
                    format!("{} > {}", chain, segment)
                }
            });

            let built = self.build_node(
                child,
                child_tag,
                child_selector.clone(),
                &child_selector,
                depth + 1,
                stats,
            );
            node.children.push(built);
        }

        node
    }

    fn text_snippet(&self, raw: &RawElement) -> Option<String> {
        let text = raw
            .children()
            .iter()
            .filter(|c| c.node_type == TEXT_NODE)
            .filter_map(|c| c.node_value.as_deref())
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        truncate_snippet(&text, self.limits.text_snippet_limit)
    }
}

impl DomNode {
    /// Enforce the depth and per-node child caps on an already-built tree.
    ///
    /// Trees that arrive deserialized never went through [`CaptureBuilder`],
    /// so they are cut back here: children of nodes at `max_depth` are
    /// dropped, and only the first `max_children` children of any node
    /// are kept. Idempotent on trees already within bounds.
    pub fn bounded(mut self, limits: &CaptureLimits) -> (DomNode, CaptureStats) {
        let mut stats = CaptureStats::default();
        {
            let mut stack: Vec<(&mut DomNode, usize)> = vec![(&mut self, 1)];
            while let Some((node, depth)) = stack.pop() {
                stats.elements_seen += 1;
                stats.elements_kept += 1;
                if depth >= limits.max_depth {
                    stats.truncated_depth += node.children.len();
                    stats.elements_seen += node.children.len();
                    node.children.clear();
                    continue;
                }
                if node.children.len() > limits.max_children {
                    let dropped = node.children.len() - limits.max_children;
                    stats.truncated_children += dropped;
                    stats.elements_seen += dropped;
                    node.children.truncate(limits.max_children);
                }
                for child in node.children.iter_mut() {
                    stack.push((child, depth + 1));
                }
            }
        }

        if stats.truncated_depth > 0 || stats.truncated_children > 0 {
            warn!(
                truncated_depth = stats.truncated_depth,
                truncated_children = stats.truncated_children,
                "DOM tree truncated at size bounds"
            );
        }
        (self, stats)
    }
}

impl Default for CaptureBuilder {
    fn default() -> Self {
        Self::new(CaptureLimits::default())
    }
}

/// Truncate to at most `limit` characters, ellipsis included.
pub fn truncate_snippet(text: &str, limit: usize) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= limit {
        return Some(text.to_string());
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    Some(out)
}

fn find_root(node: &RawElement) -> Option<&RawElement> {
    match node.node_type {
        ELEMENT_NODE => Some(node),
        DOCUMENT_NODE => {
            let elements = || node.children().iter().filter(|c| c.is_element());
            elements()
                .find(|c| c.tag() == "html")
                .or_else(|| elements().next())
        }
        _ => None,
    }
}

/// `#id` for CSS-identifier ids, `[id="..."]` otherwise.
fn id_selector(raw: &RawElement) -> Option<String> {
    let id = raw
        .attribute_pairs()
        .find(|(name, _)| name.eq_ignore_ascii_case("id"))
        .map(|(_, value)| value.trim())
        .filter(|v| !v.is_empty())?;

    if is_css_identifier(id) {
        Some(format!("#{}", id))
    } else {
        Some(format!("[id=\"{}\"]", id.replace('\\', "\\\\").replace('"', "\\\"")))
    }
}

fn is_css_identifier(value: &str) -> bool {
    let body = value.strip_prefix('-').unwrap_or(value);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '-' || c.is_ascii_alphanumeric() || !c.is_ascii())
}
