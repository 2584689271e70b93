//! a11yscope - accessibility snapshot analysis
//!
//! Main entry point for the a11yscope CLI.

mod cli;
mod cmd_analyze;
mod cmd_capture;
mod cmd_filter;
mod output;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use a11yscope_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing on stderr, plus daily rolling files when
/// `logging.directory` is set.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let console = if logging.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match &logging.directory {
        Some(dir) => {
            let log_dir = ConfigLoader::expand_path(dir);
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("a11yscope")
                .filename_suffix("log")
                .max_log_files(logging.max_log_files)
                .build(&log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The worker flushes until the guard is dropped.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    init_tracing(&config.logging)?;

    for warning in warnings {
        warn!(field = %warning.path, "{}", warning.message);
    }
    debug!(config = ?cli.config, "Configuration loaded");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Analyze {
            snapshot,
            violations,
        } => cmd_analyze::analyze(&config, &snapshot, violations.as_deref()),
        Commands::Relationships {
            snapshot,
            invalid_only,
        } => cmd_analyze::relationships(&config, &snapshot, invalid_only),
        Commands::Filter {
            snapshot,
            roles,
            aria_attrs,
            association,
            keyword,
            options,
        } => {
            let request = cmd_filter::FilterRequest {
                roles,
                aria_attrs,
                association,
                keyword,
                options,
            };
            cmd_filter::filter(&config, &snapshot, request)
        }
        Commands::Capture { dom } => cmd_capture::capture(&config, &dom),
    }
}
