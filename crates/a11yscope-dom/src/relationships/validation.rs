//! Role checks for `aria-controls` and `aria-haspopup` edges.

use crate::dom::DomNode;

use super::{AriaRelationshipValidation, RelationshipResolver};

/// Tags treated as likely popup items when checking child roles.
const LIKELY_ITEM_TAGS: [&str; 5] = ["li", "a", "button", "div", "span"];

/// Container role expected for an `aria-haspopup` value.
pub(crate) fn popup_container_role(popup: &str) -> Option<&'static str> {
    match popup {
        "true" | "menu" => Some("menu"),
        "listbox" => Some("listbox"),
        "tree" => Some("tree"),
        "grid" => Some("grid"),
        "dialog" => Some("dialog"),
        _ => None,
    }
}

/// Item role expected inside a popup container.
pub(crate) fn popup_item_role(container: &str) -> Option<&'static str> {
    match container {
        "menu" => Some("menuitem"),
        "listbox" => Some("option"),
        "tree" => Some("treeitem"),
        "grid" => Some("gridcell"),
        _ => None,
    }
}

/// Target role implied by the role of an `aria-controls` source.
fn controlled_role(source_role: &str) -> Option<&'static str> {
    match source_role {
        "tab" => Some("tabpanel"),
        _ => None,
    }
}

fn describe_role(node: &DomNode) -> String {
    match node.role() {
        Some(role) => format!("has role \"{}\"", role),
        None => "has no role".to_string(),
    }
}

impl<'a> RelationshipResolver<'a> {
    pub(super) fn validate_controls(
        &self,
        source: &DomNode,
        target_ids: &[String],
    ) -> Option<AriaRelationshipValidation> {
        let expected = source.role().and_then(controlled_role)?;

        let mut findings = Vec::new();
        let mut role_matches = true;
        for id in target_ids {
            match self.node_for_id(id) {
                None => {
                    role_matches = false;
                    findings.push(format!("Controlled element \"{}\" not found", id));
                }
                Some(target) if target.role() != Some(expected) => {
                    role_matches = false;
                    findings.push(format!(
                        "Controlled element \"{}\" {}, expected \"{}\"",
                        id,
                        describe_role(target),
                        expected
                    ));
                }
                Some(_) => {}
            }
        }

        if findings.is_empty() {
            return None;
        }
        Some(AriaRelationshipValidation {
            expected_role: Some(expected.to_string()),
            role_matches: Some(role_matches),
            expected_child_role: None,
            items_have_expected_child_role: None,
            details: findings.join("; "),
        })
    }

    pub(super) fn validate_popup(
        &self,
        popup: &str,
        target_ids: &[String],
    ) -> Option<AriaRelationshipValidation> {
        let expected = popup_container_role(popup)?;
        let item_role = popup_item_role(expected);

        let mut findings = Vec::new();
        let mut role_matches = true;
        let mut items_ok: Option<bool> = None;

        for id in target_ids {
            let Some(target) = self.node_for_id(id) else {
                role_matches = false;
                findings.push(format!("Popup \"{}\" not found", id));
                continue;
            };

            if target.role() != Some(expected) {
                role_matches = false;
                findings.push(format!(
                    "Popup \"{}\" {}, expected \"{}\"",
                    id,
                    describe_role(target),
                    expected
                ));
            }

            let Some(item_role) = item_role else {
                continue;
            };
            let items: Vec<&DomNode> = target
                .children
                .iter()
                .filter(|c| LIKELY_ITEM_TAGS.contains(&c.tag_name.as_str()))
                .collect();
            if items.is_empty() {
                continue;
            }
            let missing = items
                .iter()
                .filter(|c| c.role() != Some(item_role))
                .count();
            if missing > 0 {
                items_ok = Some(false);
                findings.push(format!(
                    "{} of {} items in \"{}\" lack role \"{}\"",
                    missing,
                    items.len(),
                    id,
                    item_role
                ));
            } else if items_ok.is_none() {
                items_ok = Some(true);
            }
        }

        if findings.is_empty() {
            return None;
        }
        Some(AriaRelationshipValidation {
            expected_role: Some(expected.to_string()),
            role_matches: Some(role_matches),
            expected_child_role: item_role.map(str::to_string),
            items_have_expected_child_role: items_ok,
            details: findings.join("; "),
        })
    }
}
