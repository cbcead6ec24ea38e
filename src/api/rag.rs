//! Retrieval ops endpoints

use axum::{Router, extract::State, routing::{get, post}};
use serde::Deserialize;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::retrieval::{RagStatus, RetrievalContext, RetrievalQuery};
use crate::domain::validation::SystemReport;
use crate::infrastructure::services::RetrievalValidator;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub visa_type: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub fn create_rag_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/search", post(search))
        .route("/validate", post(validate))
}

pub async fn status(State(state): State<AppState>) -> Json<RagStatus> {
    Json(state.orchestrator.status().await)
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<RetrievalContext>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query must not be empty").with_param("query"));
    }

    let top_k = request.top_k.unwrap_or_else(|| state.orchestrator.default_top_k());
    if top_k == 0 {
        return Err(ApiError::bad_request("top_k must be at least 1").with_param("top_k"));
    }

    let mut query = RetrievalQuery::new(request.query).with_top_k(top_k);
    if let Some(country) = request.country {
        query = query.with_country(country);
    }
    if let Some(visa_type) = request.visa_type {
        query = query.with_visa_type(visa_type);
    }

    Ok(Json(state.orchestrator.retrieve(query).await))
}

pub async fn validate(State(state): State<AppState>) -> Json<SystemReport> {
    info!("Validation requested over HTTP");
    let validator = RetrievalValidator::new(state.orchestrator.clone());
    Json(validator.validate_system().await)
}
