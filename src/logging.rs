//! Logging configuration for RABOT

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::RabotError;
use crate::Result;

/// Base name of the rolling log file, suffixed with the date
pub const LOG_FILE_PREFIX: &str = "rabot.log";

/// Initialize logging from configuration.
///
/// Console output goes to stderr so answers printed on stdout stay clean. When
/// file output is enabled the returned guard must be kept alive until exit,
/// otherwise buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    init_logging_with_level(&config.level, config)
}

/// Initialize logging, overriding the configured level (used by `--verbose`)
pub fn init_logging_with_level(level: &str, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,rabot={level}")));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = if config.file_output {
        let logs_dir = Path::new(&config.directory);
        if !logs_dir.exists() {
            std::fs::create_dir_all(logs_dir)?;
        }

        let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(non_blocking)
            .with_ansi(false); // No colors in file

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| RabotError::Custom(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!("Logging initialized with level: {}", level);
    if config.file_output {
        tracing::debug!(
            "Log files will be saved to: {}/{}.YYYY-MM-DD",
            config.directory,
            LOG_FILE_PREFIX
        );
    }

    Ok(guard)
}

/// Initialize simple console logging for testing
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .map_err(|e| RabotError::Custom(format!("Failed to initialize logging: {e}")))
}
