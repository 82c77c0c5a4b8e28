//! Utility modules for berth
//!
//! Currently this covers structured logging setup; shared helpers that do
//! not belong to a pipeline component land here.

pub mod logging;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
