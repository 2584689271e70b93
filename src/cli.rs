//! CLI definitions for a11yscope.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// a11yscope CLI.
#[derive(Parser)]
#[command(name = "a11yscope")]
#[command(about = "Accessibility snapshot analysis: DOM structure, ARIA relationships and filtering")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config file when present)
    #[arg(short, long, global = true, env = "A11YSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Normalize a snapshot and report structure, relationships and violations
    Analyze {
        /// Snapshot file (raw capture or scan-result envelope)
        #[arg(long)]
        snapshot: PathBuf,

        /// Violation list file, overrides violations embedded in the snapshot
        #[arg(long)]
        violations: Option<PathBuf>,
    },

    /// Prune the snapshot tree to nodes matching the given filters
    Filter {
        /// Snapshot file (raw capture or scan-result envelope)
        #[arg(long)]
        snapshot: PathBuf,

        /// Keep nodes with this role (repeatable, OR-combined)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Keep nodes carrying this aria-* attribute (repeatable, OR-combined)
        #[arg(long = "aria-attr")]
        aria_attrs: Vec<String>,

        /// Keep nodes that take part in an ARIA id reference
        #[arg(long)]
        association: bool,

        /// Case-insensitive substring over tag, selector, text and attributes
        #[arg(long)]
        keyword: Option<String>,

        /// Also report which filter options would still yield matches
        #[arg(long)]
        options: bool,
    },

    /// List resolved ARIA relationships
    Relationships {
        /// Snapshot file (raw capture or scan-result envelope)
        #[arg(long)]
        snapshot: PathBuf,

        /// Only relationships with validation findings
        #[arg(long)]
        invalid_only: bool,
    },

    /// Build a bounded DOM tree from a raw DOM.getDocument dump
    Capture {
        /// Document dump (`{"root": {...}}` or the root node itself)
        #[arg(long)]
        dom: PathBuf,
    },
}
