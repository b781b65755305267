//! Logging setup for applications using the DLNA SDK
//!
//! The SDK itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init_logging`] once at startup.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output at info level
    Development,
    /// Verbose output with source locations, includes SOAP exchanges
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// # Examples
///
/// ```rust,ignore
/// dlna_api::logging::init_logging(LoggingMode::Debug)?;
/// ```
///
/// # Environment Variables
///
/// - `DLNA_LOG_LEVEL`: Override the filter (e.g. "dlna_api=debug,soap_client=trace")
/// - `RUST_LOG`: Used when `DLNA_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(create_env_filter("info"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(create_env_filter("debug"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `DLNA_LOG_MODE` ("development" or "debug",
/// case-insensitive).
///
/// Anything else, including an unset variable, means silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    init_logging(mode_from(std::env::var("DLNA_LOG_MODE").ok().as_deref()))
}

fn mode_from(value: Option<&str>) -> LoggingMode {
    match value.map(str::trim) {
        Some(mode) if mode.eq_ignore_ascii_case("development") => LoggingMode::Development,
        Some(mode) if mode.eq_ignore_ascii_case("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    }
}

fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("DLNA_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
