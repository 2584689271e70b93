//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_logging;

pub use schema_logging::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Default location of the user configuration file
    /// (`<config dir>/a11yscope/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("a11yscope").join("config.toml"))
    }
}

/// Bounds and exclusions applied while reconstructing the DOM tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_children")]
    pub max_children: usize,

    #[serde(default = "default_text_snippet_limit")]
    pub text_snippet_limit: usize,

    /// Tags dropped together with their subtree.
    #[serde(default = "default_excluded_tags")]
    pub excluded_tags: Vec<String>,

    /// Presentation-only attributes.
    #[serde(default = "default_excluded_attributes")]
    pub excluded_attributes: Vec<String>,

    /// Framework-internal attribute prefixes.
    #[serde(default = "default_excluded_attribute_prefixes")]
    pub excluded_attribute_prefixes: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_children: default_max_children(),
            text_snippet_limit: default_text_snippet_limit(),
            excluded_tags: default_excluded_tags(),
            excluded_attributes: default_excluded_attributes(),
            excluded_attribute_prefixes: default_excluded_attribute_prefixes(),
        }
    }
}

fn default_max_depth() -> usize {
    25
}

fn default_max_children() -> usize {
    200
}

fn default_text_snippet_limit() -> usize {
    100
}

fn default_excluded_tags() -> Vec<String> {
    [
        "script", "style", "meta", "link", "noscript", "template", "head", "title", "base",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_excluded_attributes() -> Vec<String> {
    vec!["class".to_string(), "style".to_string()]
}

fn default_excluded_attribute_prefixes() -> Vec<String> {
    ["data-v-", "data-react", "_ngcontent", "_nghost", "ng-reflect"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
