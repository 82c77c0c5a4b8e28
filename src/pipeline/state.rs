//! Deployment state machine
//!
//! States advance strictly forward; no transition skips a state and nothing
//! moves backward except a fresh deploy starting over from `Pending`. The
//! failure state is reachable from every non-terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Accepted, nothing started yet
    Pending,

    /// Cloning the repository
    Cloning,

    /// Classifying the workspace and resolving the port/recipe
    Detecting,

    /// Building the container image
    Building,

    /// Starting the container
    Deploying,

    /// Success terminal: the container reported itself running
    Running,

    /// Failure terminal
    Failed,
}

impl DeploymentState {
    /// Terminal states admit no further transition within one deployment
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentState::Running | DeploymentState::Failed)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_advance_to(self, next: DeploymentState) -> bool {
        use DeploymentState::*;
        match (self, next) {
            (Pending, Cloning)
            | (Cloning, Detecting)
            | (Detecting, Building)
            | (Building, Deploying)
            | (Deploying, Running) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentState::Pending => "pending",
            DeploymentState::Cloning => "cloning",
            DeploymentState::Detecting => "detecting",
            DeploymentState::Building => "building",
            DeploymentState::Deploying => "deploying",
            DeploymentState::Running => "running",
            DeploymentState::Failed => "failed",
        };
        f.write_str(name)
    }
}
