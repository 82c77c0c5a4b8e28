//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::errors::DeployError;
use crate::server::handlers::{
    auto_deploy_handler, custom_deploy_handler, health_handler, logs_handler, redeploy_handler,
    status_handler,
};
use crate::server::state::ServerState;

/// Build the deployment API router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/deploy/auto", post(auto_deploy_handler))
        .route("/deploy/custom", post(custom_deploy_handler))
        .route("/deploy/redeploy/{project_id}", post(redeploy_handler))
        .route("/deploy/logs/{project_id}", get(logs_handler))
        .route("/deploy/status/{project_id}", get(status_handler))
        .route("/deploy/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the deployment API until the shutdown signal resolves
pub async fn serve(
    addr: &str,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DeployError> {
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DeployError::Server(format!("failed to bind {}: {}", addr, e)))?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| DeployError::Server(e.to_string()))
}
