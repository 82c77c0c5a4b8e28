//! Deployment request and record types

use super::state::DeploymentState;
use crate::classify::ProjectType;
use crate::errors::DeployError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// One accepted deployment request; immutable once built
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    /// Opaque project identifier; keys the workspace, image and container
    pub project_id: String,

    /// Repository to deploy
    pub git_url: String,

    /// Environment passed into the container
    pub env: BTreeMap<String, String>,

    /// Hard memory ceiling in MB (swap ceiling is set equal)
    pub memory_mb: i64,

    /// Explicit project type; auto-detected when unset
    pub project_type: Option<ProjectType>,

    /// Explicit container port; auto-detected when unset
    pub port: Option<u16>,

    /// Raw recipe override; bypasses synthesis when set
    pub recipe: Option<String>,
}

impl DeploymentRequest {
    /// Zero-configuration request: everything auto-detected
    pub fn auto(
        project_id: impl Into<String>,
        git_url: impl Into<String>,
        env: BTreeMap<String, String>,
        memory_mb: i64,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            git_url: git_url.into(),
            env,
            memory_mb,
            project_type: None,
            port: None,
            recipe: None,
        }
    }

    /// Validate invariants the pipeline relies on
    ///
    /// The project id names a workspace directory and container, so it must
    /// be non-empty and path-safe.
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.project_id.is_empty() {
            return Err(DeployError::Config("project id must not be empty".into()));
        }
        if !self
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            || self.project_id.starts_with('.')
        {
            return Err(DeployError::Config(format!(
                "project id contains unsafe characters: {}",
                self.project_id
            )));
        }
        if self.git_url.is_empty() {
            return Err(DeployError::Config("git url must not be empty".into()));
        }
        if self.memory_mb <= 0 {
            return Err(DeployError::Config(format!(
                "memory limit must be positive, got {} MB",
                self.memory_mb
            )));
        }
        if self.port == Some(0) {
            return Err(DeployError::Config("port 0 is not addressable".into()));
        }
        Ok(())
    }
}

/// Caller-supplied overrides for an advanced deployment
///
/// Unset fields fall back to auto-detection; a recipe override bypasses
/// synthesis entirely.
#[derive(Debug, Clone, Default)]
pub struct DeployConfig {
    pub project_type: Option<ProjectType>,
    pub port: Option<u16>,
    pub recipe: Option<String>,
}

/// Result of one deployment call
///
/// Owned exclusively by the pipeline while the call runs; immutable history
/// once returned. The log keeps every step message in order, success or
/// failure — it is always returned, never discarded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: Uuid,
    pub project_id: String,
    pub state: DeploymentState,
    pub project_type: Option<ProjectType>,
    pub workspace: Option<PathBuf>,
    pub port: Option<u16>,
    pub recipe: Option<String>,
    pub image_ref: Option<String>,
    pub container_ref: Option<String>,
    pub host_port: Option<u16>,
    pub revision: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub log: Vec<String>,
}

impl DeploymentRecord {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.into(),
            state: DeploymentState::Pending,
            project_type: None,
            workspace: None,
            port: None,
            recipe: None,
            image_ref: None,
            container_ref: None,
            host_port: None,
            revision: None,
            started_at: Utc::now(),
            finished_at: None,
            log: Vec::new(),
        }
    }

    /// Append a human-readable step message
    pub fn push_log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(project_id = %self.project_id, "{}", message);
        self.log.push(message);
    }

    /// Advance the state machine, rejecting illegal transitions
    pub fn advance(&mut self, next: DeploymentState) -> Result<(), DeployError> {
        if !self.state.can_advance_to(next) {
            return Err(DeployError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Drive the record to the failure terminal with a final log line
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.state.can_advance_to(DeploymentState::Failed) {
            self.state = DeploymentState::Failed;
        }
        self.push_log(message);
    }
}
