//! Container runtime boundary
//!
//! The engine is a capability behind a narrow interface: build an image,
//! create/start/stop/remove a container, inspect state, read logs. The
//! pipeline treats image and container references as opaque handles.

mod docker;

pub use docker::DockerRuntime;

use crate::errors::DeployError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Conventional container name for a project
///
/// Deterministic naming is what makes redeploy idempotent: the pipeline can
/// always address "the" container of a project without tracking handles.
pub fn container_name(project_id: &str) -> String {
    format!("berth-{}", project_id)
}

/// Conventional image tag for a project
pub fn image_tag(project_id: &str) -> String {
    format!("berth/{}:latest", project_id.to_lowercase())
}

/// Snapshot of a container's runtime state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStats {
    pub state: String,
    pub started_at: Option<String>,
    pub running: bool,
}

/// Narrow interface over the container engine
///
/// Operations fail with [`DeployError::Runtime`] (or `Build` for image
/// builds) carrying the engine's message. Stop and remove are idempotent:
/// acting on an absent container is success.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Write the recipe into the workspace and build an image from it
    ///
    /// Blocks until the build completes or the configured timeout elapses.
    async fn build_image(
        &self,
        project_id: &str,
        workspace: &Path,
        recipe: &str,
    ) -> Result<String, DeployError>;

    /// Create and start the conventionally-named container for a project
    ///
    /// Any existing container holding the name is stopped and removed first.
    /// The container `port` is published to an engine-chosen free host port;
    /// a hard memory ceiling (with equal swap ceiling) and an on-failure
    /// restart policy capped at 3 attempts are applied.
    async fn start_container(
        &self,
        project_id: &str,
        image_ref: &str,
        port: u16,
        env: &BTreeMap<String, String>,
        memory_mb: i64,
    ) -> Result<String, DeployError>;

    async fn stop_container(&self, container_ref: &str) -> Result<(), DeployError>;

    async fn remove_container(&self, container_ref: &str) -> Result<(), DeployError>;

    /// Remove the conventionally-tagged image for a project
    async fn remove_image(&self, project_id: &str) -> Result<(), DeployError>;

    async fn restart_container(&self, container_ref: &str) -> Result<(), DeployError>;

    /// True iff the engine reports the container as running
    ///
    /// Inspection errors read as unhealthy, never as failures.
    async fn is_healthy(&self, container_ref: &str) -> bool;

    /// Published host port for the container's internal `container_port`
    ///
    /// `None` when the engine has not recorded a binding yet.
    async fn host_port(&self, container_ref: &str, container_port: u16) -> Option<u16>;

    /// Tail of the container's stdout/stderr
    async fn logs(&self, container_ref: &str, tail: usize) -> Result<String, DeployError>;

    async fn stats(&self, container_ref: &str) -> Result<ContainerStats, DeployError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name_is_deterministic() {
        assert_eq!(container_name("proj-1"), "berth-proj-1");
        assert_eq!(container_name("proj-1"), container_name("proj-1"));
    }

    #[test]
    fn test_image_tag_lowercases_project_id() {
        assert_eq!(image_tag("MyApp"), "berth/myapp:latest");
    }
}
