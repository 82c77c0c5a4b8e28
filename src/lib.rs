//! berth - zero-configuration git-to-container deployment
//!
//! This library turns an arbitrary git repository into a running,
//! network-reachable container: clone the source, classify its project type
//! from file-system fingerprints, synthesize a Dockerfile, build an image,
//! start a container with resource limits, verify liveness, and roll back or
//! clean up on any failure.
//!
//! # Core Concepts
//!
//! - **Project type**: classification tag describing a repository's
//!   language/framework, driving both the default network port and the
//!   build-recipe selection
//! - **Recipe**: the parameterized multi-stage Dockerfile synthesized for a
//!   project type and port
//! - **Workspace**: the per-project filesystem checkout used for detection
//!   and building
//! - **Conventional name**: the deterministic container/image identifier
//!   derived from a project id, which makes redeploy idempotent
//!
//! # Example Usage
//!
//! ```ignore
//! use berth::config::BerthConfig;
//! use berth::pipeline::{DeploymentPipeline, DeploymentRequest};
//! use berth::runtime::DockerRuntime;
//! use berth::source::GitSourceFetcher;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! async fn deploy_one() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BerthConfig::default();
//!     config.validate()?;
//!
//!     let engine = DockerRuntime::connect(config.build_timeout).await?;
//!     let fetcher = GitSourceFetcher::new(config.scratch_root.clone());
//!     let pipeline =
//!         DeploymentPipeline::new(Arc::new(fetcher), Arc::new(engine), config.health);
//!
//!     let record = pipeline
//!         .deploy(DeploymentRequest::auto(
//!             "my-app",
//!             "https://example.com/my-app.git",
//!             BTreeMap::new(),
//!             512,
//!         ))
//!         .await;
//!
//!     println!("state: {}", record.state);
//!     for line in &record.log {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`source`]: repository acquisition into per-project workspaces
//! - [`classify`]: project-type and port detection
//! - [`recipe`]: Dockerfile synthesis registry
//! - [`runtime`]: container engine boundary (Docker via bollard)
//! - [`pipeline`]: the deployment state machine and orchestration
//! - [`server`]: the HTTP surface consumed by the platform layer

pub mod classify;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod recipe;
pub mod runtime;
pub mod server;
pub mod source;
pub mod util;

// Re-export key types for convenient access
pub use classify::{ProjectType, RuntimeFamily, TypeClassifier};
pub use config::{BerthConfig, ConfigError, HealthPolicy};
pub use errors::DeployError;
pub use pipeline::{
    DeployConfig, DeploymentPipeline, DeploymentRecord, DeploymentRequest, DeploymentState,
};
pub use recipe::RecipeRegistry;
pub use runtime::{ContainerEngine, ContainerStats, DockerRuntime};
pub use source::{GitSourceFetcher, SourceFetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
