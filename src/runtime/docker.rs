//! Docker implementation of the container engine boundary

use super::{container_name, image_tag, ContainerEngine, ContainerStats};
use crate::errors::DeployError;
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, LogsOptions, RemoveContainerOptions, RestartContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::BuildImageOptions;
use bollard::service::{
    ContainerStateStatusEnum, HostConfig, PortBinding, RestartPolicy, RestartPolicyNameEnum,
};
use bollard::Docker;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::StreamExt;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Seconds the engine waits before killing a container on stop/restart
const STOP_GRACE_SECS: i64 = 30;

/// Restart attempts the engine makes before giving up on a failing container
const MAX_RESTART_ATTEMPTS: i64 = 3;

/// [`ContainerEngine`] backed by the local Docker daemon via bollard
///
/// The client is constructed explicitly and owned by the caller; there is no
/// ambient global engine state.
pub struct DockerRuntime {
    docker: Docker,
    build_timeout: Duration,
}

impl DockerRuntime {
    /// Connect to the local daemon and verify it responds
    pub async fn connect(build_timeout: Duration) -> Result<Self, DeployError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| DeployError::Runtime(format!("failed to connect to Docker: {}", e)))?;

        let version = docker
            .version()
            .await
            .map_err(|e| DeployError::Runtime(format!("Docker daemon unreachable: {}", e)))?;
        debug!(
            api_version = version.api_version.as_deref().unwrap_or("unknown"),
            "connected to Docker daemon"
        );

        Ok(Self {
            docker,
            build_timeout,
        })
    }

    /// Wrap an existing client (used by callers that configure the
    /// connection themselves)
    pub fn with_client(docker: Docker, build_timeout: Duration) -> Self {
        Self {
            docker,
            build_timeout,
        }
    }
}

fn runtime_err(err: BollardError) -> DeployError {
    DeployError::Runtime(err.to_string())
}

/// Tar+gzip a workspace directory into an image build context
fn build_context(workspace: &Path) -> std::io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", workspace)?;
    builder.into_inner()?.finish()
}

fn status_str(status: ContainerStateStatusEnum) -> &'static str {
    match status {
        ContainerStateStatusEnum::CREATED => "created",
        ContainerStateStatusEnum::RUNNING => "running",
        ContainerStateStatusEnum::PAUSED => "paused",
        ContainerStateStatusEnum::RESTARTING => "restarting",
        ContainerStateStatusEnum::REMOVING => "removing",
        ContainerStateStatusEnum::EXITED => "exited",
        ContainerStateStatusEnum::DEAD => "dead",
        ContainerStateStatusEnum::EMPTY => "unknown",
    }
}

#[async_trait]
impl ContainerEngine for DockerRuntime {
    async fn build_image(
        &self,
        project_id: &str,
        workspace: &Path,
        recipe: &str,
    ) -> Result<String, DeployError> {
        info!(project_id, "building image");

        tokio::fs::write(workspace.join("Dockerfile"), recipe)
            .await
            .map_err(|e| DeployError::Build(format!("failed to write Dockerfile: {}", e)))?;

        let context = build_context(workspace)
            .map_err(|e| DeployError::Build(format!("failed to pack build context: {}", e)))?;

        let tag = image_tag(project_id);
        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: tag.clone(),
            rm: true,
            ..Default::default()
        };

        let mut stream = self
            .docker
            .build_image(options, None, Some(context.into()));

        let drain = async {
            while let Some(item) = stream.next().await {
                let progress = item.map_err(|e| DeployError::Build(e.to_string()))?;
                if let Some(message) = progress.error {
                    return Err(DeployError::Build(message));
                }
                if let Some(line) = progress.stream {
                    let line = line.trim();
                    if !line.is_empty() {
                        debug!(project_id, "{}", line);
                    }
                }
            }
            Ok(())
        };

        tokio::time::timeout(self.build_timeout, drain)
            .await
            .map_err(|_| {
                DeployError::Build(format!(
                    "image build timed out after {}s",
                    self.build_timeout.as_secs()
                ))
            })??;

        let inspect = self
            .docker
            .inspect_image(&tag)
            .await
            .map_err(|e| DeployError::Build(format!("built image missing: {}", e)))?;

        let image_ref = inspect.id.unwrap_or(tag);
        info!(project_id, %image_ref, "image built");
        Ok(image_ref)
    }

    async fn start_container(
        &self,
        project_id: &str,
        image_ref: &str,
        port: u16,
        env: &BTreeMap<String, String>,
        memory_mb: i64,
    ) -> Result<String, DeployError> {
        let name = container_name(project_id);
        info!(project_id, %name, "starting container");

        // Idempotent restart semantics: clear any prior holder of the name.
        if let Err(err) = self.stop_container(&name).await {
            debug!(%name, error = %err, "pre-start stop failed");
        }
        if let Err(err) = self.remove_container(&name).await {
            debug!(%name, error = %err, "pre-start remove failed");
        }

        let env_list: Vec<String> = env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let port_key = format!("{}/tcp", port);
        let memory_bytes = memory_mb * 1024 * 1024;

        let config = Config {
            image: Some(image_ref.to_string()),
            env: Some(env_list),
            exposed_ports: Some(
                [(port_key.clone(), HashMap::new())].into_iter().collect(),
            ),
            host_config: Some(HostConfig {
                port_bindings: Some(
                    [(
                        port_key,
                        Some(vec![PortBinding {
                            host_ip: None,
                            // 0 lets the engine pick a free host port
                            host_port: Some("0".to_string()),
                        }]),
                    )]
                    .into_iter()
                    .collect(),
                ),
                memory: Some(memory_bytes),
                memory_swap: Some(memory_bytes),
                restart_policy: Some(RestartPolicy {
                    name: Some(RestartPolicyNameEnum::ON_FAILURE),
                    maximum_retry_count: Some(MAX_RESTART_ATTEMPTS),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(
                Some(CreateContainerOptions {
                    name: name.clone(),
                    platform: None,
                }),
                config,
            )
            .await
            .map_err(runtime_err)?;

        self.docker
            .start_container(&created.id, None::<StartContainerOptions<String>>)
            .await
            .map_err(runtime_err)?;

        info!(project_id, container_ref = %created.id, "container started");
        Ok(created.id)
    }

    async fn stop_container(&self, container_ref: &str) -> Result<(), DeployError> {
        match self
            .docker
            .stop_container(container_ref, Some(StopContainerOptions { t: STOP_GRACE_SECS }))
            .await
        {
            Ok(()) => {
                info!(container_ref, "container stopped");
                Ok(())
            }
            Err(BollardError::DockerResponseServerError {
                status_code: 404 | 304,
                ..
            }) => Ok(()),
            Err(err) => Err(runtime_err(err)),
        }
    }

    async fn remove_container(&self, container_ref: &str) -> Result<(), DeployError> {
        match self
            .docker
            .remove_container(
                container_ref,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await
        {
            Ok(()) => {
                info!(container_ref, "container removed");
                Ok(())
            }
            Err(BollardError::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(()),
            Err(err) => Err(runtime_err(err)),
        }
    }

    async fn remove_image(&self, project_id: &str) -> Result<(), DeployError> {
        let tag = image_tag(project_id);
        match self.docker.remove_image(&tag, None, None).await {
            Ok(_) => {
                info!(%tag, "image removed");
                Ok(())
            }
            Err(BollardError::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(()),
            Err(err) => Err(runtime_err(err)),
        }
    }

    async fn restart_container(&self, container_ref: &str) -> Result<(), DeployError> {
        self.docker
            .restart_container(
                container_ref,
                Some(RestartContainerOptions {
                    t: STOP_GRACE_SECS as isize,
                }),
            )
            .await
            .map_err(runtime_err)
    }

    async fn is_healthy(&self, container_ref: &str) -> bool {
        match self.docker.inspect_container(container_ref, None).await {
            Ok(inspect) => matches!(
                inspect.state.and_then(|s| s.status),
                Some(ContainerStateStatusEnum::RUNNING)
            ),
            Err(err) => {
                warn!(container_ref, error = %err, "health inspection failed");
                false
            }
        }
    }

    async fn host_port(&self, container_ref: &str, container_port: u16) -> Option<u16> {
        let inspect = match self.docker.inspect_container(container_ref, None).await {
            Ok(inspect) => inspect,
            Err(err) => {
                warn!(container_ref, error = %err, "port inspection failed");
                return None;
            }
        };

        let port_key = format!("{}/tcp", container_port);
        inspect
            .network_settings
            .and_then(|ns| ns.ports)
            .and_then(|ports| ports.get(&port_key).cloned())
            .flatten()
            .and_then(|bindings| bindings.first().cloned())
            .and_then(|binding| binding.host_port)
            .and_then(|port| port.parse::<u16>().ok())
    }

    async fn logs(&self, container_ref: &str, tail: usize) -> Result<String, DeployError> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        let mut stream = self.docker.logs(container_ref, Some(options));
        let mut output = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(runtime_err)?;
            output.push_str(&chunk.to_string());
        }
        Ok(output)
    }

    async fn stats(&self, container_ref: &str) -> Result<ContainerStats, DeployError> {
        let inspect = self
            .docker
            .inspect_container(container_ref, None)
            .await
            .map_err(runtime_err)?;

        let state = inspect.state.unwrap_or_default();
        Ok(ContainerStats {
            state: state
                .status
                .map(status_str)
                .unwrap_or("unknown")
                .to_string(),
            started_at: state.started_at,
            running: state.running.unwrap_or(false),
        })
    }
}
