use std::fs::create_dir_all;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot create log directory {dir}: {source}")]
    Directory {
        dir: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Installs the global `tracing` subscriber: a daily rolling file under `config.dir`,
/// plus coloured stdout output when `config.to_stdout` is set.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init_logger(config: &LogConfig) -> Result<WorkerGuard, LoggerError> {
    create_dir_all(&config.dir).map_err(|source| LoggerError::Directory {
        dir: config.dir.clone(),
        source,
    })?;

    let file_appender = rolling::daily(&config.dir, &config.file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config.to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    tracing::debug!(dir = %config.dir, file = %config.file, "logger initialised");

    Ok(guard)
}
