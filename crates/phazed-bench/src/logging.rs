use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, ResolvedOutputs};

const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Keeps the background writer alive; dropping it flushes pending events.
pub struct LoggingGuard {
    _worker: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Sends decision and runner events as JSON lines to `telemetry.jsonl` next to
/// the summary. Returns `None` when structured logging is off.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let dir = outputs.artifact_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating artifact directory {}", dir.display()))?;
    let telemetry_path = dir.join(TELEMETRY_FILE);
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating {}", telemetry_path.display()))?;

    let (writer, worker) = NonBlockingBuilder::default().lossy(false).finish(file);
    let level = logging.level().unwrap_or(Level::INFO);

    let installed = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .try_init();
    if installed.is_err() {
        // Tests and embedders may have installed their own subscriber.
        tracing::debug!(target: "phazed_bench::logging", "global subscriber already set");
    }

    Ok(Some(LoggingGuard {
        _worker: worker,
        telemetry_path,
    }))
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
