//! Tracing setup: compact stdout plus a rotating, non-blocking log file.
//!
//! `RUST_LOG` overrides both filters when set.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, LogRotation};

/// Must be held for the lifetime of the process; dropping it loses buffered
/// file output.
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Install the global subscriber. `verbose` raises stdout from WARN to INFO.
pub fn init(config: &AppConfig, verbose: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log dir {}", config.log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(config.log_rotation.into())
        .filename_prefix(&config.log_file)
        .max_log_files(config.max_log_files.max(1))
        .build(&config.log_dir)
        .context("creating rolling log file")?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let stdout_default = if verbose {
        "options_ladder=info,tower_http=info,warn"
    } else {
        "warn"
    };
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(stdout_default));
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("options_ladder=debug,tower_http=debug,info"));

    let stdout_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(stdout_filter);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::debug!(
        dir = %config.log_dir.display(),
        file = %config.log_file,
        "logging initialized"
    );

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}
