//! Configuration management for berth
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `BERTH_HOST`: HTTP bind host - default: "0.0.0.0"
//! - `BERTH_PORT`: HTTP bind port - default: "7070"
//! - `BERTH_SCRATCH_ROOT`: workspace root for cloned sources - default:
//!   system temp dir + "berth-workspaces"
//! - `BERTH_BUILD_TIMEOUT_SECS`: image build timeout - default: "600"
//! - `BERTH_DEFAULT_MEMORY_MB`: container memory ceiling when the caller
//!   leaves it unset - default: "512"
//! - `BERTH_HEALTH_INITIAL_DELAY_MS`: delay before the first liveness probe -
//!   default: "2000"
//! - `BERTH_HEALTH_MAX_DELAY_MS`: backoff cap between probes - default: "15000"
//! - `BERTH_HEALTH_MAX_ATTEMPTS`: number of liveness probes - default: "5"
//! - `BERTH_LOG_LEVEL`: logging level - default: "info"

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7070;
const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 600;
const DEFAULT_MEMORY_MB: i64 = 512;
const DEFAULT_HEALTH_INITIAL_DELAY_MS: u64 = 2_000;
const DEFAULT_HEALTH_MAX_DELAY_MS: u64 = 15_000;
const DEFAULT_HEALTH_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Liveness-probe policy applied after a container starts
///
/// The first probe runs after `initial_delay`; the delay doubles after every
/// unsuccessful probe, capped at `max_delay`, for up to `max_attempts`
/// probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_HEALTH_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_HEALTH_MAX_DELAY_MS),
            max_attempts: DEFAULT_HEALTH_MAX_ATTEMPTS,
        }
    }
}

/// Main configuration structure for berth
///
/// Construct with `Default::default()` to load from environment variables
/// with fallback defaults.
#[derive(Debug, Clone)]
pub struct BerthConfig {
    /// HTTP bind host
    pub host: String,

    /// HTTP bind port
    pub port: u16,

    /// Root directory for per-project source workspaces
    pub scratch_root: PathBuf,

    /// Image build timeout
    pub build_timeout: Duration,

    /// Memory ceiling (MB) applied when a request leaves it unset
    pub default_memory_mb: i64,

    /// Liveness-probe policy
    pub health: HealthPolicy,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BerthConfig {
    fn default() -> Self {
        let host = env::var("BERTH_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = env::var("BERTH_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let scratch_root = env::var("BERTH_SCRATCH_ROOT")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("berth-workspaces"));

        let build_timeout = env::var("BERTH_BUILD_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS));

        let default_memory_mb = env::var("BERTH_DEFAULT_MEMORY_MB")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_MEMORY_MB);

        let health = HealthPolicy {
            initial_delay: env::var("BERTH_HEALTH_INITIAL_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_HEALTH_INITIAL_DELAY_MS)),
            max_delay: env::var("BERTH_HEALTH_MAX_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_HEALTH_MAX_DELAY_MS)),
            max_attempts: env::var("BERTH_HEALTH_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(DEFAULT_HEALTH_MAX_ATTEMPTS),
        };

        let log_level = env::var("BERTH_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            host,
            port,
            scratch_root,
            build_timeout,
            default_memory_mb,
            health,
            log_level,
        }
    }
}

impl BerthConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value is out of its sane range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "build timeout must be at least 1 second".to_string(),
            ));
        }
        if self.build_timeout > Duration::from_secs(3600) {
            return Err(ConfigError::ValidationFailed(
                "build timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.default_memory_mb <= 0 {
            return Err(ConfigError::ValidationFailed(
                "default memory limit must be positive".to_string(),
            ));
        }

        if self.health.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "health poll needs at least one attempt".to_string(),
            ));
        }
        if self.health.initial_delay > self.health.max_delay {
            return Err(ConfigError::ValidationFailed(
                "health initial delay cannot exceed the max delay".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationFailed(format!(
                    "invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for BerthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Berth Configuration:")?;
        writeln!(f, "  Bind: {}", self.bind_addr())?;
        writeln!(f, "  Scratch Root: {}", self.scratch_root.display())?;
        writeln!(f, "  Build Timeout: {}s", self.build_timeout.as_secs())?;
        writeln!(f, "  Default Memory: {} MB", self.default_memory_mb)?;
        writeln!(
            f,
            "  Health Poll: {} attempts, {}ms..{}ms backoff",
            self.health.max_attempts,
            self.health.initial_delay.as_millis(),
            self.health.max_delay.as_millis()
        )?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("BERTH_HOST"),
            EnvGuard::unset("BERTH_PORT"),
            EnvGuard::unset("BERTH_SCRATCH_ROOT"),
            EnvGuard::unset("BERTH_BUILD_TIMEOUT_SECS"),
            EnvGuard::unset("BERTH_DEFAULT_MEMORY_MB"),
            EnvGuard::unset("BERTH_LOG_LEVEL"),
        ];

        let config = BerthConfig::default();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.build_timeout, Duration::from_secs(600));
        assert_eq!(config.default_memory_mb, 512);
        assert_eq!(config.health, HealthPolicy::default());
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("BERTH_HOST", "127.0.0.1"),
            EnvGuard::set("BERTH_PORT", "9000"),
            EnvGuard::set("BERTH_SCRATCH_ROOT", "/var/lib/berth"),
            EnvGuard::set("BERTH_BUILD_TIMEOUT_SECS", "120"),
            EnvGuard::set("BERTH_DEFAULT_MEMORY_MB", "1024"),
            EnvGuard::set("BERTH_HEALTH_MAX_ATTEMPTS", "8"),
            EnvGuard::set("BERTH_LOG_LEVEL", "debug"),
        ];

        let config = BerthConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.scratch_root, PathBuf::from("/var/lib/berth"));
        assert_eq!(config.build_timeout, Duration::from_secs(120));
        assert_eq!(config.default_memory_mb, 1024);
        assert_eq!(config.health.max_attempts, 8);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation_rejects_zero_build_timeout() {
        let config = BerthConfig {
            build_timeout: Duration::ZERO,
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_nonpositive_memory() {
        let config = BerthConfig {
            default_memory_mb: 0,
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let config = BerthConfig {
            log_level: "loud".to_string(),
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_health_delays() {
        let config = BerthConfig {
            health: HealthPolicy {
                initial_delay: Duration::from_secs(30),
                max_delay: Duration::from_secs(1),
                max_attempts: 3,
            },
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = sample();
        assert_eq!(config.bind_addr(), "0.0.0.0:7070");
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", sample());
        assert!(display.contains("Berth Configuration:"));
        assert!(display.contains("Scratch Root:"));
    }

    fn sample() -> BerthConfig {
        BerthConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scratch_root: PathBuf::from("/tmp/berth-workspaces"),
            build_timeout: Duration::from_secs(600),
            default_memory_mb: 512,
            health: HealthPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}
