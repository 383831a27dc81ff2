//! Structured logging infrastructure for ztworld.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use tracing::Subscriber;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the filter, preferring `RUST_LOG` over the configured default level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// The stderr formatting layer shared by every entry point.
fn fmt_layer<S>(json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn install(default_level: &str, json: bool) {
    let result: Result<(), TryInitError> = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer(json))
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Initialize the logging system with structured output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use ztworld_core::logging;
///
/// logging::init();
/// tracing::info!("worldgen started");
/// ```
pub fn init() {
    install("info", false);
}

/// Initialize the logging system with JSON output.
///
/// This format is suitable for log aggregation when the generator is driven
/// by the surrounding web application.
pub fn init_json() {
    install("info", true);
}

/// Initialize logging from the `[logging]` section of a config file.
///
/// Safe to call more than once, as are [`init`] and [`init_json`]; later
/// calls are ignored.
pub fn init_from_config(config: &LoggingConfig) {
    install(&config.level, config.json);
}
