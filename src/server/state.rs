//! Shared server state

use crate::pipeline::DeploymentPipeline;

/// State handed to every request handler
pub struct ServerState {
    pub pipeline: DeploymentPipeline,

    /// Memory ceiling applied when a request omits `memoryMB`
    pub default_memory_mb: i64,
}
