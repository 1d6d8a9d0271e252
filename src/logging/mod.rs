/*!
 * Logging Module
 * Console plus daily rolling files under the log directory
 */
pub mod config;
pub mod middleware;

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use config::LogConfig;

/// Flushes buffered log lines on drop; keep it alive for the whole process.
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LogConfig) -> LogGuards {
    if let Err(e) = std::fs::create_dir_all(&config.directory) {
        eprintln!(
            "Could not create log directory {}: {}",
            config.directory.display(),
            e
        );
    }

    // All logs
    let (file_writer, file_guard) = non_blocking(rolling::daily(&config.directory, "app.log"));
    // Errors only
    let (error_writer, error_guard) = non_blocking(rolling::daily(&config.directory, "error.log"));
    let (console_writer, console_guard) = non_blocking(io::stdout());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let file_layer = fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        let error_layer = fmt::layer()
            .json()
            .with_writer(error_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

        let console_layer = fmt::layer()
            .json()
            .with_writer(console_writer)
            .with_target(false);

        subscriber
            .with(file_layer)
            .with(error_layer)
            .with(console_layer)
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let error_layer = fmt::layer()
            .with_writer(error_writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_target(true)
            .pretty();

        subscriber
            .with(file_layer)
            .with(error_layer)
            .with(console_layer)
            .init();
    }

    tracing::info!(
        level = %config.level,
        directory = %config.directory.display(),
        "Logging initialized"
    );

    LogGuards {
        _guards: vec![file_guard, error_guard, console_guard],
    }
}
