//! `filter` subcommand handler.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use a11yscope_config::Config;
use a11yscope_dom::{
    AriaRelationshipsMap, DomNode, DomTreeFilters, FilterEngine, FilterOptions, FilteredView,
};

use crate::output::{load_scan, print_json};

/// Filter flags as given on the command line.
#[derive(Debug, Default)]
pub(crate) struct FilterRequest {
    pub roles: Vec<String>,
    pub aria_attrs: Vec<String>,
    pub association: bool,
    pub keyword: Option<String>,
    pub options: bool,
}

impl FilterRequest {
    pub(crate) fn filters(&self) -> DomTreeFilters {
        let mut filters = DomTreeFilters::default();
        for role in &self.roles {
            filters = filters.with_role(role.trim());
        }
        for attr in &self.aria_attrs {
            filters = filters.with_aria_attr(attr.trim().to_ascii_lowercase());
        }
        if self.association {
            filters = filters.with_association();
        }
        if let Some(keyword) = &self.keyword {
            filters = filters.with_keyword(keyword.as_str());
        }
        filters
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FilterReport {
    #[serde(flatten)]
    pub view: FilteredView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FilterOptions>,
}

pub(crate) fn run_filter(tree: Option<&DomNode>, request: &FilterRequest) -> FilterReport {
    let relationships = AriaRelationshipsMap::build(tree);
    let engine = FilterEngine::new(tree, &relationships);
    let filters = request.filters();

    FilterReport {
        view: engine.apply(&filters),
        options: request
            .options
            .then(|| engine.option_availability(&filters)),
    }
}

/// Handle `filter`.
pub(crate) fn filter(config: &Config, snapshot: &Path, request: FilterRequest) -> anyhow::Result<()> {
    let input = load_scan(config, snapshot)?;
    let report = run_filter(input.capture.dom_tree.as_ref(), &request);
    info!(
        active = report.view.active,
        matches = report.view.match_count,
        "Filter applied"
    );
    print_json(config, &report)
}
