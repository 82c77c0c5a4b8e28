//! Error types for the berth deployment service

use thiserror::Error;

/// Main error type for deployment operations
///
/// `Source`, `Build` and `Runtime` abort the current deployment and drive it
/// to the failed state; `HealthCheck` is likewise terminal for one deploy
/// call. None of them cross the public pipeline boundary — the pipeline
/// folds them into the returned record's log.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("source error: {0}")]
    Source(String),

    #[error("build error: {0}")]
    Build(String),

    #[error("container runtime error: {0}")]
    Runtime(String),

    #[error("health check failed: {0}")]
    HealthCheck(String),

    #[error("rollback failed: {0}")]
    Rollback(String),

    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::Source("clone failed".to_string());
        assert_eq!(err.to_string(), "source error: clone failed");

        let err = DeployError::InvalidTransition {
            from: "pending".to_string(),
            to: "running".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid state transition: pending -> running"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DeployError = io.into();
        assert!(matches!(err, DeployError::Io(_)));
    }
}
