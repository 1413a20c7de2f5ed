//! Structured logging setup using the `tracing` ecosystem.
//!
//! Console output goes to stderr so stdout stays clean for command results
//! and saved media. The file log rotates daily and can be JSON.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants;
use crate::error::AzResult;

/// Crates of the HTTP stack that stay at `warn` when a bare level is given.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "rustls", "reqwest"];

/// Build the filter for `level`.
///
/// A bare level (`debug`, `info`, ...) applies to this client's crates and
/// keeps the HTTP stack at `warn`. Anything else is used as a full
/// `EnvFilter` expression. Unparseable input falls back to `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    let level = level.trim();
    let directive = if level.parse::<tracing::Level>().is_ok() {
        QUIET_TARGETS
            .iter()
            .fold(level.to_string(), |acc, target| format!("{acc},{target}=warn"))
    } else {
        level.to_string()
    };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber: compact stderr output plus a daily
/// rolling file under `log_dir`.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> AzResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, constants::LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // Only one of these is Some; `Option<Layer>` is itself a layer.
    let json_layer = json_output.then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(writer.clone())
    });
    let text_layer = (!json_output).then(|| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
    });

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console_layer)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::debug!(level, dir = %log_dir.display(), json_output, "logging initialized");

    Ok(LogGuard { _guard: guard })
}

/// Keeps the non-blocking file writer alive; dropping it flushes the log.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Console-only logging, for when no log directory is available.
/// Later calls are no-ops.
pub fn init_console_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .try_init();
}
