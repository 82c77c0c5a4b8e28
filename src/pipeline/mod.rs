//! Deployment pipeline orchestration
//!
//! Sequences fetch → classify → synthesize → build → run → liveness poll,
//! owns the deployment state machine, and compensates on failure. The
//! pipeline is the unit of serialization per project: the project lock is
//! held from before cloning until the terminal state.

mod locks;
mod record;
mod state;

pub use locks::ProjectLocks;
pub use record::{DeployConfig, DeploymentRecord, DeploymentRequest};
pub use state::DeploymentState;

use crate::classify::TypeClassifier;
use crate::config::HealthPolicy;
use crate::errors::DeployError;
use crate::recipe::RecipeRegistry;
use crate::runtime::{container_name, ContainerEngine, ContainerStats};
use crate::source::{SourceFetcher, UNKNOWN_REVISION};
use chrono::Utc;
use std::cmp;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shorten an engine reference for log lines
fn short_ref(reference: &str) -> &str {
    let trimmed = reference.strip_prefix("sha256:").unwrap_or(reference);
    &trimmed[..cmp::min(12, trimmed.len())]
}

/// Orchestrates the deployment of git repositories into running containers
pub struct DeploymentPipeline {
    fetcher: Arc<dyn SourceFetcher>,
    engine: Arc<dyn ContainerEngine>,
    classifier: TypeClassifier,
    recipes: RecipeRegistry,
    locks: ProjectLocks,
    health: HealthPolicy,
}

impl DeploymentPipeline {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        engine: Arc<dyn ContainerEngine>,
        health: HealthPolicy,
    ) -> Self {
        Self {
            fetcher,
            engine,
            classifier: TypeClassifier::new(),
            recipes: RecipeRegistry::with_defaults(),
            locks: ProjectLocks::new(),
            health,
        }
    }

    /// Deploy a repository end to end
    ///
    /// Always returns a record with a terminal state and the full ordered
    /// step log; expected failures never escape as errors.
    pub async fn deploy(&self, request: DeploymentRequest) -> DeploymentRecord {
        let _guard = self.locks.acquire(&request.project_id).await;
        self.deploy_locked(request).await
    }

    /// Deploy honoring caller-supplied overrides
    ///
    /// Auto-detection runs only for the fields the caller left unset.
    pub async fn deploy_with_config(
        &self,
        mut request: DeploymentRequest,
        config: DeployConfig,
    ) -> DeploymentRecord {
        request.project_type = config.project_type.or(request.project_type);
        request.port = config.port.or(request.port);
        request.recipe = config.recipe.or(request.recipe);

        let _guard = self.locks.acquire(&request.project_id).await;
        self.deploy_locked(request).await
    }

    /// Tear down whatever currently runs under the project's conventional
    /// name, then deploy fresh
    ///
    /// Teardown is best-effort; "not found" is not an error. Guarantees at
    /// most one live container per project id without the caller knowing the
    /// prior container's reference.
    pub async fn redeploy(
        &self,
        project_id: &str,
        git_url: &str,
        env: BTreeMap<String, String>,
        memory_mb: i64,
    ) -> DeploymentRecord {
        info!(project_id, "redeploying");
        let _guard = self.locks.acquire(project_id).await;

        self.teardown_existing(project_id).await;
        self.deploy_locked(DeploymentRequest::auto(project_id, git_url, env, memory_mb))
            .await
    }

    /// Stop the conventionally-named container and restart a previously
    /// known one
    ///
    /// No snapshotting of prior images is kept here; the caller supplies the
    /// reference to roll back to.
    pub async fn rollback(
        &self,
        project_id: &str,
        previous_container_ref: &str,
    ) -> Result<(), DeployError> {
        info!(project_id, previous_container_ref, "rolling back");
        let _guard = self.locks.acquire(project_id).await;

        let current = container_name(project_id);
        self.engine
            .stop_container(&current)
            .await
            .map_err(|e| DeployError::Rollback(e.to_string()))?;
        self.engine
            .remove_container(&current)
            .await
            .map_err(|e| DeployError::Rollback(e.to_string()))?;
        self.engine
            .restart_container(previous_container_ref)
            .await
            .map_err(|e| DeployError::Rollback(e.to_string()))?;

        info!(project_id, "rollback completed");
        Ok(())
    }

    /// Tail of the conventionally-named container's output
    pub async fn logs(&self, project_id: &str, tail: usize) -> Result<String, DeployError> {
        self.engine.logs(&container_name(project_id), tail).await
    }

    /// Runtime state of the conventionally-named container
    pub async fn status(&self, project_id: &str) -> Result<ContainerStats, DeployError> {
        self.engine.stats(&container_name(project_id)).await
    }

    async fn deploy_locked(&self, request: DeploymentRequest) -> DeploymentRecord {
        let mut record = DeploymentRecord::new(&request.project_id);

        let outcome = match request.validate() {
            Ok(()) => self.run(&request, &mut record).await,
            Err(err) => Err(err),
        };

        if let Err(err) = outcome {
            record.fail(format!("✗ Deployment failed: {}", err));
            self.compensate(&request.project_id, &record).await;
        }

        record.finished_at = Some(Utc::now());
        record
    }

    async fn run(
        &self,
        request: &DeploymentRequest,
        record: &mut DeploymentRecord,
    ) -> Result<(), DeployError> {
        record.advance(DeploymentState::Cloning)?;
        let workspace = self
            .fetcher
            .fetch(&request.git_url, &request.project_id)
            .await?;
        record.workspace = Some(workspace.clone());
        record.push_log("✓ Repository cloned successfully");

        let revision = self.fetcher.current_revision(&workspace).await;
        if revision != UNKNOWN_REVISION {
            record.push_log(format!("✓ Checked out revision {}", short_ref(&revision)));
        }
        record.revision = Some(revision);

        record.advance(DeploymentState::Detecting)?;
        let project_type = match request.project_type {
            Some(explicit) => explicit,
            None => self.classifier.classify(&workspace),
        };
        record.project_type = Some(project_type);
        record.push_log(format!(
            "✓ Detected project type: {}",
            project_type.display_name()
        ));

        let port = match request.port {
            Some(explicit) => explicit,
            None => self.classifier.detect_port(&workspace, project_type),
        };
        record.port = Some(port);
        record.push_log(format!("✓ Resolved application port: {}", port));

        let recipe = match &request.recipe {
            Some(text) => {
                record.push_log("✓ Using caller-supplied build recipe");
                text.clone()
            }
            None => {
                let rendered = self.recipes.render(project_type, port);
                record.push_log("✓ Build recipe generated");
                rendered
            }
        };
        record.recipe = Some(recipe.clone());

        record.advance(DeploymentState::Building)?;
        let image_ref = self
            .engine
            .build_image(&request.project_id, &workspace, &recipe)
            .await?;
        record.image_ref = Some(image_ref.clone());
        record.push_log(format!(
            "✓ Image built successfully: {}",
            short_ref(&image_ref)
        ));

        record.advance(DeploymentState::Deploying)?;
        let container_ref = self
            .engine
            .start_container(
                &request.project_id,
                &image_ref,
                port,
                &request.env,
                request.memory_mb,
            )
            .await?;
        record.container_ref = Some(container_ref.clone());
        record.push_log(format!("✓ Container started: {}", short_ref(&container_ref)));

        if let Some(host_port) = self.engine.host_port(&container_ref, port).await {
            record.host_port = Some(host_port);
            record.push_log(format!("✓ Application published on host port {}", host_port));
        }

        if self.await_healthy(&container_ref).await {
            record.advance(DeploymentState::Running)?;
            record.push_log("✓ Deployment successful! Application is running");
            Ok(())
        } else {
            Err(DeployError::HealthCheck(format!(
                "container not running after {} probes",
                self.health.max_attempts
            )))
        }
    }

    /// Bounded exponential-backoff liveness poll
    async fn await_healthy(&self, container_ref: &str) -> bool {
        let mut delay = self.health.initial_delay;
        for attempt in 1..=self.health.max_attempts {
            tokio::time::sleep(delay).await;
            if self.engine.is_healthy(container_ref).await {
                return true;
            }
            debug!(container_ref, attempt, "container not running yet");
            delay = cmp::min(delay * 2, self.health.max_delay);
        }
        false
    }

    /// Undo partial work after a failure
    ///
    /// Compensation failures are logged and never mask the original error.
    async fn compensate(&self, project_id: &str, record: &DeploymentRecord) {
        if let Some(container_ref) = &record.container_ref {
            if let Err(err) = self.engine.stop_container(container_ref).await {
                warn!(project_id, error = %err, "compensating stop failed");
            }
            if let Err(err) = self.engine.remove_container(container_ref).await {
                warn!(project_id, error = %err, "compensating remove failed");
            }
        }
        self.fetcher.cleanup(project_id).await;
    }

    async fn teardown_existing(&self, project_id: &str) {
        let name = container_name(project_id);
        if let Err(err) = self.engine.stop_container(&name).await {
            debug!(project_id, error = %err, "no container to stop");
        }
        if let Err(err) = self.engine.remove_container(&name).await {
            debug!(project_id, error = %err, "no container to remove");
        }
        if let Err(err) = self.engine.remove_image(project_id).await {
            debug!(project_id, error = %err, "no image to clean up");
        }
    }
}
