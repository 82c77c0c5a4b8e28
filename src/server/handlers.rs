//! HTTP request handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::ProjectType;
use crate::pipeline::{DeployConfig, DeploymentRecord, DeploymentRequest};
use crate::server::state::ServerState;

/// Auto-deploy request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoDeployRequest {
    pub project_id: String,
    pub git_url: String,
    #[serde(default)]
    pub env_vars: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "memoryMB")]
    pub memory_mb: Option<i64>,
}

/// Custom-deploy request body; unset fields fall back to auto-detection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDeployRequest {
    pub project_id: String,
    pub git_url: String,
    #[serde(default)]
    pub env_vars: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "memoryMB")]
    pub memory_mb: Option<i64>,
    #[serde(default)]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub custom_dockerfile: Option<String>,
    #[serde(default)]
    pub build_command: Option<String>,
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub root_directory: Option<String>,
}

/// Redeploy request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeployRequest {
    pub git_url: String,
    #[serde(default)]
    pub env_vars: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "memoryMB")]
    pub memory_mb: Option<i64>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

fn resolve_memory(requested: Option<i64>, default_mb: i64) -> Result<i64, StatusCode> {
    match requested {
        Some(mb) if mb <= 0 => Err(StatusCode::BAD_REQUEST),
        Some(mb) => Ok(mb),
        None => Ok(default_mb),
    }
}

/// POST /deploy/auto
pub async fn auto_deploy_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AutoDeployRequest>,
) -> Result<Json<DeploymentRecord>, StatusCode> {
    info!(project_id = %request.project_id, "auto-deploy requested");

    let memory_mb = resolve_memory(request.memory_mb, state.default_memory_mb)?;
    let record = state
        .pipeline
        .deploy(DeploymentRequest::auto(
            request.project_id,
            request.git_url,
            request.env_vars.unwrap_or_default(),
            memory_mb,
        ))
        .await;

    Ok(Json(record))
}

/// POST /deploy/custom
pub async fn custom_deploy_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CustomDeployRequest>,
) -> Result<Json<DeploymentRecord>, StatusCode> {
    info!(project_id = %request.project_id, "custom deploy requested");

    if request.build_command.is_some()
        || request.start_command.is_some()
        || request.root_directory.is_some()
    {
        debug!("buildCommand/startCommand/rootDirectory are accepted but not applied");
    }

    let memory_mb = resolve_memory(request.memory_mb, state.default_memory_mb)?;
    let base = DeploymentRequest::auto(
        request.project_id,
        request.git_url,
        request.env_vars.unwrap_or_default(),
        memory_mb,
    );
    let config = DeployConfig {
        project_type: request.project_type,
        port: request.port,
        recipe: request.custom_dockerfile,
    };

    let record = state.pipeline.deploy_with_config(base, config).await;
    Ok(Json(record))
}

/// POST /deploy/redeploy/{project_id}
pub async fn redeploy_handler(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
    Json(request): Json<RedeployRequest>,
) -> Result<Json<DeploymentRecord>, StatusCode> {
    info!(project_id = %project_id, "redeploy requested");

    let memory_mb = resolve_memory(request.memory_mb, state.default_memory_mb)?;
    let record = state
        .pipeline
        .redeploy(
            &project_id,
            &request.git_url,
            request.env_vars.unwrap_or_default(),
            memory_mb,
        )
        .await;

    Ok(Json(record))
}

/// Query parameters for the log tail endpoint
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub tail: Option<usize>,
}

/// Container log tail response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    pub project_id: String,
    pub logs: String,
}

/// GET /deploy/logs/{project_id}
pub async fn logs_handler(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, StatusCode> {
    let tail = query.tail.unwrap_or(100);
    let logs = state
        .pipeline
        .logs(&project_id, tail)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(LogsResponse { project_id, logs }))
}

/// GET /deploy/status/{project_id}
pub async fn status_handler(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let stats = state
        .pipeline
        .status(&project_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(stats))
}

/// GET /deploy/health — liveness of the pipeline service itself
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "berth".to_string(),
        version: crate::VERSION.to_string(),
    })
}
