use super::*;

fn tabs_tree() -> DomNode {
    DomNode::new("html", "html").with_child(
        DomNode::new("body", "body")
            .with_child(
                DomNode::new("div", "body > div")
                    .with_attr("role", "tablist")
                    .with_child(
                        DomNode::new("button", "#tab1")
                            .with_attr("id", "tab1")
                            .with_attr("role", "tab")
                            .with_attr("aria-controls", "panel1"),
                    ),
            )
            .with_child(
                DomNode::new("section", "#panel1")
                    .with_attr("id", "panel1")
                    .with_attr("role", "panel")
                    .with_attr("aria-labelledby", "tab1"),
            ),
    )
}

#[test]
fn test_empty_tree_yields_empty_maps() {
    let map = AriaRelationshipsMap::build(None);
    assert!(map.id_to_selector.is_empty());
    assert!(map.selector_to_relationships.is_empty());
    assert!(map.id_to_references.is_empty());
}

#[test]
fn test_id_collection() {
    let tree = tabs_tree();
    let map = AriaRelationshipsMap::build(Some(&tree));
    assert_eq!(map.id_to_selector.get("tab1").map(String::as_str), Some("#tab1"));
    assert_eq!(map.id_to_selector.get("panel1").map(String::as_str), Some("#panel1"));
}

#[test]
fn test_tab_controls_wrong_role() {
    let tree = tabs_tree();
    let map = AriaRelationshipsMap::build(Some(&tree));

    let rels = map.relationships_for("#tab1");
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].kind, RelationshipType::Controls);
    assert_eq!(rels[0].target_ids, vec!["panel1"]);

    let validation = rels[0].validation.as_ref().unwrap();
    assert_eq!(validation.role_matches, Some(false));
    assert_eq!(validation.expected_role.as_deref(), Some("tabpanel"));
    assert!(validation.details.contains("panel1"));
    assert!(validation.details.contains("tabpanel"));
}

#[test]
fn test_tab_controls_valid_has_no_validation() {
    let tree = DomNode::new("body", "body")
        .with_child(
            DomNode::new("button", "#t")
                .with_attr("id", "t")
                .with_attr("role", "tab")
                .with_attr("aria-controls", "p"),
        )
        .with_child(
            DomNode::new("div", "#p")
                .with_attr("id", "p")
                .with_attr("role", "tabpanel"),
        );
    let map = AriaRelationshipsMap::build(Some(&tree));
    assert!(map.relationships_for("#t")[0].validation.is_none());
    assert_eq!(map.invalid_relationships().count(), 0);
}

#[test]
fn test_controls_missing_target() {
    let tree = DomNode::new("button", "#t")
        .with_attr("role", "tab")
        .with_attr("aria-controls", "ghost");
    let map = AriaRelationshipsMap::build(Some(&tree));
    let validation = map.relationships_for("#t")[0].validation.clone().unwrap();
    assert!(validation.details.contains("ghost"));
    assert!(validation.details.contains("not found"));
    assert_eq!(map.dangling_ids(), vec!["ghost"]);
}

#[test]
fn test_controls_without_tab_role_not_validated() {
    let tree = DomNode::new("button", "#b").with_attr("aria-controls", "ghost");
    let map = AriaRelationshipsMap::build(Some(&tree));
    assert!(map.relationships_for("#b")[0].validation.is_none());
}

#[test]
fn test_reference_lists_split_on_whitespace() {
    let tree = DomNode::new("input", "#email")
        .with_attr("id", "email")
        .with_attr("aria-labelledby", "  lbl   hint ")
        .with_attr("aria-describedby", "err");
    let map = AriaRelationshipsMap::build(Some(&tree));

    let rels = map.relationships_for("#email");
    assert_eq!(rels.len(), 2);
    let labelledby = rels.iter().find(|r| r.kind == RelationshipType::Labelledby).unwrap();
    assert_eq!(labelledby.target_ids, vec!["lbl", "hint"]);
    assert_eq!(map.references_to("hint").len(), 1);
    assert_eq!(map.references_to("err")[0].kind, RelationshipType::Describedby);
}

#[test]
fn test_blank_attributes_produce_no_edges() {
    let tree = DomNode::new("div", "body > div")
        .with_attr("aria-labelledby", "   ")
        .with_attr("aria-haspopup", "");
    let map = AriaRelationshipsMap::build(Some(&tree));
    assert_eq!(map.relationship_count(), 0);
}

fn menu_tree(item_role: &str) -> DomNode {
    DomNode::new("body", "body")
        .with_child(
            DomNode::new("button", "#menu-btn")
                .with_attr("aria-haspopup", "true")
                .with_attr("aria-controls", "menu"),
        )
        .with_child(
            DomNode::new("ul", "#menu")
                .with_attr("id", "menu")
                .with_attr("role", "menu")
                .with_child(DomNode::new("li", "#menu > li:nth-of-type(1)").with_attr("role", "menuitem"))
                .with_child(DomNode::new("li", "#menu > li:nth-of-type(2)").with_attr("role", item_role)),
        )
}

#[test]
fn test_haspopup_menu_valid() {
    let tree = menu_tree("menuitem");
    let map = AriaRelationshipsMap::build(Some(&tree));
    let popup = map
        .relationships_for("#menu-btn")
        .iter()
        .find(|r| r.kind == RelationshipType::Haspopup)
        .unwrap();
    assert_eq!(popup.popup_type.as_deref(), Some("true"));
    assert_eq!(popup.target_ids, vec!["menu"]);
    assert!(popup.validation.is_none());
}

#[test]
fn test_haspopup_menu_items_missing_role() {
    let tree = menu_tree("none");
    let map = AriaRelationshipsMap::build(Some(&tree));
    let popup = map
        .relationships_for("#menu-btn")
        .iter()
        .find(|r| r.kind == RelationshipType::Haspopup)
        .unwrap();
    let validation = popup.validation.as_ref().unwrap();
    assert_eq!(validation.role_matches, Some(true));
    assert_eq!(validation.expected_child_role.as_deref(), Some("menuitem"));
    assert_eq!(validation.items_have_expected_child_role, Some(false));
    assert!(validation.details.contains("1 of 2"));
}

#[test]
fn test_haspopup_listbox_wrong_container_role() {
    let tree = DomNode::new("body", "body")
        .with_child(
            DomNode::new("input", "#combo")
                .with_attr("aria-haspopup", "listbox")
                .with_attr("aria-controls", "opts"),
        )
        .with_child(DomNode::new("div", "#opts").with_attr("id", "opts"));
    let map = AriaRelationshipsMap::build(Some(&tree));
    let popup = map
        .invalid_relationships()
        .find(|r| r.kind == RelationshipType::Haspopup)
        .unwrap();
    let validation = popup.validation.as_ref().unwrap();
    assert_eq!(validation.expected_role.as_deref(), Some("listbox"));
    assert_eq!(validation.role_matches, Some(false));
    assert!(validation.details.contains("has no role"));
}

#[test]
fn test_haspopup_without_controls_not_validated() {
    let tree = DomNode::new("button", "#b").with_attr("aria-haspopup", "menu");
    let map = AriaRelationshipsMap::build(Some(&tree));
    let rels = map.relationships_for("#b");
    assert_eq!(rels.len(), 1);
    assert!(rels[0].target_ids.is_empty());
    assert!(rels[0].validation.is_none());
}

#[test]
fn test_haspopup_false_not_validated() {
    let tree = DomNode::new("button", "#b")
        .with_attr("aria-haspopup", "false")
        .with_attr("aria-controls", "ghost");
    let map = AriaRelationshipsMap::build(Some(&tree));
    let popup = map
        .relationships_for("#b")
        .iter()
        .find(|r| r.kind == RelationshipType::Haspopup)
        .unwrap();
    assert!(popup.validation.is_none());
}

#[test]
fn test_duplicate_ids_last_write_wins() {
    let tree = DomNode::new("body", "body")
        .with_child(DomNode::new("div", "body > div:nth-of-type(1)").with_attr("id", "x"))
        .with_child(DomNode::new("div", "body > div:nth-of-type(2)").with_attr("id", "x"));
    let map = AriaRelationshipsMap::build(Some(&tree));
    assert_eq!(
        map.id_to_selector.get("x").map(String::as_str),
        Some("body > div:nth-of-type(2)")
    );
}

#[test]
fn test_resolve_is_idempotent() {
    let tree = tabs_tree();
    assert_eq!(
        AriaRelationshipsMap::build(Some(&tree)),
        AriaRelationshipsMap::build(Some(&tree))
    );
}

#[test]
fn test_transpose_invariant() {
    let tree = menu_tree("none");
    let map = AriaRelationshipsMap::build(Some(&tree));
    for rel in map.relationships() {
        for id in &rel.target_ids {
            assert!(map
                .references_to(id)
                .iter()
                .any(|r| r.selector == rel.source_selector && r.kind == rel.kind));
        }
    }
    let total_targets: usize = map.relationships().map(|r| r.target_ids.len()).sum();
    let total_refs: usize = map.id_to_references.values().map(Vec::len).sum();
    assert_eq!(total_targets, total_refs);
}

#[test]
fn test_is_associated() {
    let tree = tabs_tree();
    let map = AriaRelationshipsMap::build(Some(&tree));
    let tab = tree.find_by_selector("#tab1").unwrap();
    let tablist = tree.find_by_selector("body > div").unwrap();
    assert!(map.is_associated(tab));
    assert!(!map.is_associated(tablist));
}

#[test]
fn test_relationship_serialization() {
    let tree = tabs_tree();
    let map = AriaRelationshipsMap::build(Some(&tree));
    let value = serde_json::to_value(&map).unwrap();
    assert_eq!(value["selectorToRelationships"]["#tab1"][0]["type"], "controls");
    assert_eq!(value["idToReferences"]["panel1"][0]["selector"], "#tab1");
    assert_eq!(value["idToSelector"]["tab1"], "#tab1");
}
