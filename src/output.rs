//! Shared input loading and JSON output for the subcommands.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use a11yscope_config::Config;
use a11yscope_dom::ScanInput;

use crate::cmd_capture::capture_limits;

/// Load a snapshot file (raw capture or scan-result envelope), bounding its
/// tree with the configured capture limits.
pub(crate) fn load_scan(config: &Config, path: &Path) -> anyhow::Result<ScanInput> {
    let limits = capture_limits(&config.capture);
    let input = ScanInput::load_with_limits(path, &limits)
        .with_context(|| format!("loading snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        has_tree = input.capture.dom_tree.is_some(),
        violations = input.violations.as_ref().map_or(0, Vec::len),
        "Snapshot loaded"
    );
    Ok(input)
}

/// Serialize `value` to stdout, pretty-printed unless `output.pretty` is off.
pub(crate) fn print_json<T: Serialize>(config: &Config, value: &T) -> anyhow::Result<()> {
    let text = render_json(config, value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    Ok(())
}

pub(crate) fn render_json<T: Serialize>(config: &Config, value: &T) -> anyhow::Result<String> {
    let text = if config.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
