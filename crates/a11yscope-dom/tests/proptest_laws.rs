//! Property tests for relationship and filter laws over random trees.

use a11yscope_dom::filter::{collect_matches, matches, prune, would_produce_matches};
use a11yscope_dom::{AriaRelationshipsMap, DomNode, DomTreeFilters, FilterDimension};
use proptest::prelude::*;
use proptest::test_runner::Config;

const IDS: [&str; 4] = ["a", "b", "c", "d"];
const ROLES: [&str; 4] = ["tab", "tabpanel", "menu", "navigation"];
const TAGS: [&str; 4] = ["div", "span", "button", "li"];

fn arb_node() -> impl Strategy<Value = DomNode> {
    (
        0usize..TAGS.len(),
        proptest::option::of(0usize..IDS.len()),
        proptest::option::of(0usize..ROLES.len()),
        proptest::option::of(proptest::collection::vec(0usize..IDS.len(), 1..3)),
        proptest::option::of(0usize..IDS.len()),
    )
        .prop_map(|(tag, id, role, labelledby, controls)| {
            let mut node = DomNode::new(TAGS[tag], "");
            if let Some(id) = id {
                node = node.with_attr("id", IDS[id]);
            }
            if let Some(role) = role {
                node = node.with_attr("role", ROLES[role]);
            }
            if let Some(ids) = labelledby {
                let list: Vec<&str> = ids.into_iter().map(|i| IDS[i]).collect();
                node = node.with_attr("aria-labelledby", list.join(" "));
            }
            if let Some(id) = controls {
                node = node.with_attr("aria-controls", IDS[id]);
            }
            node
        })
}

fn arb_tree() -> impl Strategy<Value = DomNode> {
    arb_node()
        .prop_recursive(4, 32, 4, |inner| {
            (arb_node(), proptest::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
                node.children = children;
                node
            })
        })
        .prop_map(|mut root| {
            assign_selectors(&mut root, "root");
            root
        })
}

/// Unique path selectors so selector-keyed maps see every node.
fn assign_selectors(node: &mut DomNode, path: &str) {
    node.selector = path.to_string();
    for (i, child) in node.children.iter_mut().enumerate() {
        assign_selectors(child, &format!("{path} > *:nth-child({})", i + 1));
    }
}

/// `filters` plus one non-role clause, or `None` when that dimension is
/// already set.
fn with_extra_clause(filters: &DomTreeFilters, clause: usize, pick: usize) -> Option<DomTreeFilters> {
    let filters = filters.clone();
    match clause {
        0 if filters.aria_attrs.is_empty() => {
            let attr = ["aria-labelledby", "aria-controls"][pick % 2];
            Some(filters.with_aria_attr(attr))
        }
        1 if !filters.association_id => Some(filters.with_association()),
        2 if filters.keyword.trim().is_empty() => Some(filters.with_keyword(TAGS[pick % TAGS.len()])),
        _ => None,
    }
}

fn arb_filters() -> impl Strategy<Value = DomTreeFilters> {
    (
        proptest::collection::btree_set(0usize..ROLES.len(), 0..2),
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(0usize..TAGS.len()),
    )
        .prop_map(|(roles, aria, association, keyword)| {
            let mut filters = DomTreeFilters::default();
            for r in roles {
                filters = filters.with_role(ROLES[r]);
            }
            if aria {
                filters = filters.with_aria_attr("aria-labelledby");
            }
            if association {
                filters = filters.with_association();
            }
            if let Some(k) = keyword {
                filters = filters.with_keyword(TAGS[k]);
            }
            filters
        })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn transpose_matches_forward_edges(tree in arb_tree()) {
        let map = AriaRelationshipsMap::build(Some(&tree));
        for rel in map.relationships() {
            for id in &rel.target_ids {
                prop_assert!(map
                    .references_to(id)
                    .iter()
                    .any(|r| r.selector == rel.source_selector && r.kind == rel.kind));
            }
        }
        let forward: usize = map.relationships().map(|r| r.target_ids.len()).sum();
        let backward: usize = map.id_to_references.values().map(Vec::len).sum();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn resolution_is_idempotent(tree in arb_tree()) {
        prop_assert_eq!(
            AriaRelationshipsMap::build(Some(&tree)),
            AriaRelationshipsMap::build(Some(&tree))
        );
    }

    #[test]
    fn every_match_survives_pruning(tree in arb_tree(), filters in arb_filters()) {
        let map = AriaRelationshipsMap::build(Some(&tree));
        let hits = collect_matches(&tree, &filters, &map);
        match prune(&tree, &filters, &map) {
            Some(pruned) => {
                for hit in &hits {
                    prop_assert!(pruned.find_by_selector(&hit.selector).is_some());
                }
            }
            None => {
                prop_assert!(hits.is_empty());
            }
        }
    }

    #[test]
    fn pruned_leaves_sit_under_a_match(tree in arb_tree(), filters in arb_filters()) {
        prop_assume!(filters.is_active());
        let map = AriaRelationshipsMap::build(Some(&tree));
        if let Some(pruned) = prune(&tree, &filters, &map) {
            prop_assert!(pruned.node_count() <= tree.node_count());
            for leaf in pruned.iter().filter(|n| n.children.is_empty()) {
                let covered = tree
                    .iter()
                    .filter(|n| leaf.selector.starts_with(&n.selector))
                    .any(|n| matches(n, &filters, &map));
                prop_assert!(covered);
            }
        }
    }

    #[test]
    fn adding_a_clause_never_adds_matches(tree in arb_tree(), filters in arb_filters(), role in 0usize..ROLES.len()) {
        prop_assume!(filters.is_active() && filters.keyword.trim().is_empty());
        let map = AriaRelationshipsMap::build(Some(&tree));
        let narrower = filters.clone().with_keyword(ROLES[role]);
        let wide = collect_matches(&tree, &filters, &map).len();
        let narrow = collect_matches(&tree, &narrower, &map).len();
        prop_assert!(narrow <= wide);
    }

    #[test]
    fn matched_nodes_keep_their_full_subtree(tree in arb_tree(), filters in arb_filters()) {
        let map = AriaRelationshipsMap::build(Some(&tree));
        let pruned = prune(&tree, &filters, &map);
        for node in tree.iter().filter(|n| matches(n, &filters, &map)) {
            let copy = pruned.as_ref().and_then(|p| p.find_by_selector(&node.selector));
            prop_assert_eq!(copy, Some(node));
        }
    }

    #[test]
    fn infeasible_role_stays_infeasible(
        tree in arb_tree(),
        filters in arb_filters(),
        role in 0usize..ROLES.len(),
        clause in 0usize..3,
        pick in 0usize..8,
    ) {
        let map = AriaRelationshipsMap::build(Some(&tree));
        let role = ROLES[role];
        prop_assume!(!would_produce_matches(role, FilterDimension::Role, &filters, Some(&tree), &map));
        let Some(narrower) = with_extra_clause(&filters, clause, pick) else {
            return Ok(());
        };
        prop_assert!(!would_produce_matches(role, FilterDimension::Role, &narrower, Some(&tree), &map));
    }
}
