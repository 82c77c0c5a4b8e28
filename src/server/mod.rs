//! HTTP surface for the deployment pipeline
//!
//! Consumed by the surrounding platform's CRUD layer: it supplies a project
//! id, a git URL and optional overrides, and reads back the deployment
//! record with its state and step log.

mod handlers;
mod serve;
mod state;

pub use handlers::{
    AutoDeployRequest, CustomDeployRequest, HealthResponse, LogsResponse, RedeployRequest,
};
pub use serve::{router, serve};
pub use state::ServerState;
