//! Structured logging setup for berth
//!
//! Initialization and configuration for structured logging using the
//! `tracing` ecosystem: console output by default, optional JSON output for
//! production, and runtime configuration via `RUST_LOG` / `BERTH_LOG_LEVEL`.
//!
//! ```no_run
//! use berth::util::logging;
//!
//! logging::init_from_env();
//!
//! use tracing::info;
//! info!("service started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format (for structured logging in production)
    pub use_json: bool,

    /// Include the module target (e.g., berth::pipeline) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging configuration with the specified level
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Creates a logging configuration for production use (JSON output)
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
        }
    }
}

/// Initialize logging with the given configuration
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            for directive in [
                format!("berth={}", config.level),
                "hyper=warn".to_string(),
                "h2=warn".to_string(),
                "bollard=warn".to_string(),
            ] {
                if let Ok(parsed) = directive.parse() {
                    filter = filter.add_directive(parsed);
                }
            }
        }

        let registry = tracing_subscriber::registry().with(filter);

        if config.use_json {
            registry
                .with(fmt::layer().json().with_target(config.include_target))
                .init();
        } else {
            registry
                .with(fmt::layer().with_target(config.include_target))
                .init();
        }
    });
}

/// Initialize logging with default configuration
pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initialize logging from environment variables
///
/// Reads `BERTH_LOG_LEVEL` (trace|debug|info|warn|error) and
/// `BERTH_LOG_JSON` (true|false).
pub fn init_from_env() {
    let level = env::var("BERTH_LOG_LEVEL")
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(Level::INFO);

    let use_json = env::var("BERTH_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        include_target: true,
    });
}

/// Parse a log level string, returning None for unrecognized values
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}
