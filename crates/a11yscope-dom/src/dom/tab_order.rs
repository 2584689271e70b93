//! Keyboard tab sequence derived from the tree.

use serde::{Deserialize, Serialize};

use super::DomNode;

/// One stop in the keyboard tab sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStop {
    /// 1-based position in the sequence.
    pub position: usize,
    pub selector: String,
    pub tag_name: String,
    /// Parsed `tabindex`, when present and numeric.
    pub tabindex: Option<i64>,
}

/// Compute the sequential focus order of `root`.
///
/// Elements with a positive `tabindex` come first, ascending by value and
/// then in document order. Elements with `tabindex=0` and natively
/// focusable elements follow in document order. Negative `tabindex`,
/// `disabled` controls, hidden inputs and anchors without `href` are skipped.
pub fn tab_sequence(root: &DomNode) -> Vec<TabStop> {
    let mut positive: Vec<(i64, usize, &DomNode)> = Vec::new();
    let mut natural: Vec<&DomNode> = Vec::new();

    for (doc_index, node) in root.iter().enumerate() {
        let tabindex = parse_tabindex(node);
        match tabindex {
            Some(t) if t < 0 => continue,
            Some(t) if t > 0 => {
                if !is_disabled(node) {
                    positive.push((t, doc_index, node));
                }
            }
            Some(_) => {
                if !is_disabled(node) {
                    natural.push(node);
                }
            }
            None => {
                if is_natively_focusable(node) {
                    natural.push(node);
                }
            }
        }
    }

    positive.sort_by_key(|(t, idx, _)| (*t, *idx));

    positive
        .into_iter()
        .map(|(_, _, node)| node)
        .chain(natural)
        .enumerate()
        .map(|(i, node)| TabStop {
            position: i + 1,
            selector: node.selector.clone(),
            tag_name: node.tag_name.clone(),
            tabindex: parse_tabindex(node),
        })
        .collect()
}

fn parse_tabindex(node: &DomNode) -> Option<i64> {
    node.non_blank_attr("tabindex")?.parse().ok()
}

fn is_disabled(node: &DomNode) -> bool {
    matches!(
        node.tag_name.as_str(),
        "button" | "input" | "select" | "textarea" | "fieldset"
    ) && node.attr("disabled").is_some()
}

fn is_natively_focusable(node: &DomNode) -> bool {
    if is_disabled(node) {
        return false;
    }
    match node.tag_name.as_str() {
        "a" | "area" => node.attr("href").is_some(),
        "input" => !node
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden")),
        "button" | "select" | "textarea" | "iframe" | "summary" => true,
        _ => node
            .attr("contenteditable")
            .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true")),
    }
}
