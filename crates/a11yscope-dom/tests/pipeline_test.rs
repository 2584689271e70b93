//! End-to-end tests: scan result JSON through normalization, relationship
//! resolution, filtering and the violation join.

use std::io::Write;

use a11yscope_dom::{
    AriaRelationshipsMap, DomTreeFilters, FilterEngine, ScanInput, SnapshotNormalizer,
    ViolationTargetMap,
};
use serde_json::json;

fn scan_result() -> serde_json::Value {
    json!({
        "domAnalysis": {
            "headings": [
                { "level": 1, "text": "Welcome" },
                { "level": 3, "text": "Details" },
                { "level": "bad" }
            ],
            "landmarks": [{ "role": "main" }, { "role": "navigation", "label": "Primary" }],
            "roles": [{ "element": "div", "role": "tablist" }],
            "forms": [
                { "type": "text", "label": "Email", "required": true },
                { "type": "text" },
                { "type": "submit" }
            ],
            "focusable": [
                { "tabOrder": 0, "element": "a", "label": "Home", "href": "/" },
                { "tabOrder": 2, "element": "button", "label": "Later", "tabindex": "2" },
                { "tabOrder": 1, "element": "input", "label": "First", "tabindex": 1 }
            ],
            "domTree": {
                "tagName": "html",
                "selector": "html",
                "children": [{
                    "tagName": "body",
                    "selector": "body",
                    "children": [
                        {
                            "tagName": "nav",
                            "selector": "body > nav",
                            "attributes": { "role": "navigation", "aria-label": "Primary" },
                            "children": [{
                                "tagName": "a",
                                "selector": "body > nav > a",
                                "attributes": { "href": "/" },
                                "textSnippet": "Home"
                            }]
                        },
                        {
                            "tagName": "button",
                            "selector": "#tab1",
                            "attributes": { "id": "tab1", "role": "tab", "aria-controls": "panel1" }
                        },
                        {
                            "tagName": "div",
                            "selector": "#panel1",
                            "attributes": { "id": "panel1", "role": "tabpanel", "aria-labelledby": "tab1" },
                            "children": [{
                                "tagName": "img",
                                "selector": "#hero",
                                "attributes": { "id": "hero", "src": "hero.png" }
                            }]
                        }
                    ]
                }]
            }
        },
        "violations": [{
            "id": "image-alt",
            "impact": "critical",
            "tags": ["wcag2a", "wcag111"],
            "nodes": [{ "html": "<img id=\"hero\">", "target": ["#hero"] }]
        }]
    })
}

#[test]
fn test_full_pipeline() {
    let input = ScanInput::from_value(&scan_result());
    let analysis = SnapshotNormalizer::normalize(input.capture);

    assert_eq!(analysis.headings.len(), 2);
    assert!(!analysis.summary.missing_h1);
    assert_eq!(analysis.summary.skipped_heading_levels, vec![2]);
    assert!(!analysis.summary.heading_hierarchy_valid);
    assert!(analysis.summary.has_main_landmark);
    assert_eq!(analysis.summary.unlabeled_form_controls, 1);
    assert_eq!(analysis.summary.total_nodes, 7);

    let order: Vec<_> = analysis.focusable.iter().map(|f| f.element.as_str()).collect();
    assert_eq!(order, vec!["input", "button", "a"]);

    let tree = analysis.dom_tree.as_ref();
    let relationships = AriaRelationshipsMap::build(tree);
    assert_eq!(relationships.relationship_count(), 2);
    assert_eq!(relationships.invalid_relationships().count(), 0);

    let engine = FilterEngine::new(tree, &relationships);
    let view = engine.apply(&DomTreeFilters::default().with_association());
    let hits: Vec<_> = view.matches.iter().map(|m| m.selector.as_str()).collect();
    assert_eq!(hits, vec!["#tab1", "#panel1"]);

    let violations = input.violations.unwrap_or_default();
    let targets = ViolationTargetMap::from_violations(&violations);
    let hero = tree.and_then(|t| t.find_by_selector("#hero")).unwrap();
    let flagged = targets.flagged(hero).unwrap();
    assert_eq!(flagged.count, 1);
    assert!(flagged.has_wcag);
}

#[test]
fn test_filtered_tree_keeps_ancestors_of_flagged_node() {
    let input = ScanInput::from_value(&scan_result());
    let analysis = SnapshotNormalizer::normalize(input.capture);
    let relationships = AriaRelationshipsMap::build(analysis.dom_tree.as_ref());
    let engine = FilterEngine::new(analysis.dom_tree.as_ref(), &relationships);

    let pruned = engine
        .prune(&DomTreeFilters::default().with_keyword("hero.png"))
        .unwrap();
    let path: Vec<_> = pruned.iter().map(|n| n.selector.as_str()).collect();
    assert_eq!(path, vec!["html", "body", "#panel1", "#hero"]);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", scan_result()["domAnalysis"]).unwrap();

    let input = ScanInput::load(file.path()).unwrap();
    assert!(input.violations.is_none());
    assert_eq!(input.capture.headings.len(), 2);
    assert!(input.capture.dom_tree.is_some());
}

#[test]
fn test_load_rejects_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(ScanInput::load(file.path()).is_err());
}

#[test]
fn test_empty_capture_degrades_gracefully() {
    let input = ScanInput::from_value(&json!({}));
    let analysis = SnapshotNormalizer::normalize(input.capture);
    assert!(analysis.dom_tree.is_none());
    assert!(analysis.summary.missing_h1);

    let relationships = AriaRelationshipsMap::build(None);
    let engine = FilterEngine::new(None, &relationships);
    let view = engine.apply(&DomTreeFilters::default().with_role("main"));
    assert!(view.tree.is_none());
    assert_eq!(view.match_count, 0);
}
