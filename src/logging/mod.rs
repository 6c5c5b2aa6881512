//! Structured logging for the registration engine.
//!
//! The engine reports every attempt, fault, and decision as `tracing`
//! events; the process-wide subscriber is the diagnostic sink. Embedders
//! (and tests) can swap in their own sink with
//! `tracing::subscriber::with_default`.

pub mod config;
pub mod spans;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use config::LoggingConfig;

use crate::error::RegistrationError;
use crate::Result;

/// Initialize the global subscriber with the provided configuration.
///
/// Returns the worker guard for the non-blocking file writer when file
/// logging is enabled; the caller must keep it alive for the lifetime of
/// the process or buffered log lines are lost on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    config.validate().map_err(RegistrationError::Config)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
        EnvFilter::new(format!(
            "{}={},{}::engine={}",
            crate_target, config.global_level, crate_target, config.engine_level
        ))
    });

    let mut layers = Vec::new();

    // Console output layer
    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(config.include_file_location)
            .with_line_number(config.include_file_location);
        layers.push(console_layer.boxed());
    }

    // File output layer
    let mut guard = None;
    if let Some(ref log_dir) = config.log_directory {
        let file_appender = tracing_appender::rolling::daily(log_dir, "registration.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json();
        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| RegistrationError::LoggingInit(e.to_string()))?;

    tracing::info!(?config, "Logging system initialized");
    Ok(guard)
}
