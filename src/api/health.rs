//! Health check endpoints for container probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use super::types::Json;
use crate::domain::retrieval::{OrchestratorState, RagStatus};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message,
        }
    }
}

/// Returns 200 while the process is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// 503 until the pipeline is ready; a ready pipeline without the remote
/// index or cache still serves requests
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.orchestrator.status().await;
    let checks = readiness_checks(&status);

    let overall = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let status_code = match overall {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    let response = HealthResponse {
        status: overall,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
    };

    (status_code, Json(response))
}

fn readiness_checks(status: &RagStatus) -> Vec<HealthCheck> {
    let pipeline = match status.state {
        OrchestratorState::Ready => HealthCheck::new("retrieval", HealthStatus::Healthy, None),
        other => HealthCheck::new(
            "retrieval",
            HealthStatus::Unhealthy,
            Some(format!("Pipeline state: {:?}", other)),
        ),
    };

    let remote = if status.remote_available {
        HealthCheck::new("remote_index", HealthStatus::Healthy, None)
    } else {
        HealthCheck::new(
            "remote_index",
            HealthStatus::Degraded,
            Some("Serving from local cache".to_string()),
        )
    };

    let cache = if status.cache_populated {
        HealthCheck::new(
            "local_cache",
            HealthStatus::Healthy,
            Some(format!("{} records", status.cache_stats.total_documents)),
        )
    } else {
        HealthCheck::new("local_cache", HealthStatus::Degraded, Some("Cache is empty".to_string()))
    };

    vec![pipeline, remote, cache]
}
