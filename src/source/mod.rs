//! Source acquisition
//!
//! Clones a remote repository into a per-project workspace under the scratch
//! root. The default branch is tried first, then the conventional fallback
//! name, before the failure is surfaced.

use crate::errors::DeployError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Branch tried first on clone
pub const PRIMARY_BRANCH: &str = "main";

/// Branch tried when the primary is absent
pub const FALLBACK_BRANCH: &str = "master";

/// Sentinel returned when the current revision cannot be resolved
pub const UNKNOWN_REVISION: &str = "unknown";

/// Acquires project sources into a workspace
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Clone `git_url` into a fresh workspace for `project_id`
    ///
    /// Any pre-existing workspace for the project is removed first; at most
    /// one workspace per project exists at a time.
    async fn fetch(&self, git_url: &str, project_id: &str) -> Result<PathBuf, DeployError>;

    /// Best-effort current commit of a workspace
    ///
    /// Returns [`UNKNOWN_REVISION`] rather than failing.
    async fn current_revision(&self, workspace: &Path) -> String;

    /// Remove the workspace for a project; idempotent, never fails
    async fn cleanup(&self, project_id: &str);
}

/// [`SourceFetcher`] backed by the `git` CLI
pub struct GitSourceFetcher {
    scratch_root: PathBuf,
}

impl GitSourceFetcher {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }

    /// Workspace directory for a project
    pub fn workspace_path(&self, project_id: &str) -> PathBuf {
        self.scratch_root.join(project_id)
    }

    async fn clone_branch(
        &self,
        git_url: &str,
        branch: &str,
        target: &Path,
    ) -> Result<(), String> {
        if target.exists() {
            tokio::fs::remove_dir_all(target)
                .await
                .map_err(|e| format!("failed to clear workspace: {}", e))?;
        }

        debug!(branch, target = %target.display(), "cloning repository");
        let output = Command::new("git")
            .args(["clone", "--depth", "1", "-b", branch, git_url])
            .arg(target)
            .output()
            .await
            .map_err(|e| format!("failed to run git clone: {}", e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

#[async_trait]
impl SourceFetcher for GitSourceFetcher {
    async fn fetch(&self, git_url: &str, project_id: &str) -> Result<PathBuf, DeployError> {
        info!(project_id, git_url, "fetching repository");

        tokio::fs::create_dir_all(&self.scratch_root)
            .await
            .map_err(|e| DeployError::Source(format!("failed to create scratch root: {}", e)))?;

        let target = self.workspace_path(project_id);

        match self.clone_branch(git_url, PRIMARY_BRANCH, &target).await {
            Ok(()) => {
                info!(project_id, branch = PRIMARY_BRANCH, "repository cloned");
                Ok(target)
            }
            Err(primary_err) => {
                debug!(
                    project_id,
                    error = %primary_err,
                    "primary branch clone failed, trying fallback"
                );
                match self.clone_branch(git_url, FALLBACK_BRANCH, &target).await {
                    Ok(()) => {
                        info!(project_id, branch = FALLBACK_BRANCH, "repository cloned");
                        Ok(target)
                    }
                    Err(fallback_err) => Err(DeployError::Source(format!(
                        "failed to clone {}: {}",
                        git_url, fallback_err
                    ))),
                }
            }
        }
    }

    async fn current_revision(&self, workspace: &Path) -> String {
        let result = Command::new("git")
            .current_dir(workspace)
            .args(["rev-parse", "HEAD"])
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => UNKNOWN_REVISION.to_string(),
        }
    }

    async fn cleanup(&self, project_id: &str) {
        let target = self.workspace_path(project_id);
        if !target.exists() {
            return;
        }
        match tokio::fs::remove_dir_all(&target).await {
            Ok(()) => info!(project_id, "workspace removed"),
            Err(err) => warn!(project_id, error = %err, "workspace cleanup failed"),
        }
    }
}
