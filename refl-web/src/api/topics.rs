//! Topic resource endpoints

use axum::{extract::State, Json};
use refl_common::db::{store, Topic};
use serde::Deserialize;

use crate::error::WebError;
use crate::AppState;

/// Request body for POST /api/topics
#[derive(Debug, Deserialize)]
pub struct CreateTopicsRequest {
    pub names: Vec<String>,
}

/// POST /api/topics
///
/// Resolve-or-create each name; returns the resolved topics in input
/// order. Safe to resubmit - existing names are reused, never duplicated.
pub async fn create_topics(
    State(state): State<AppState>,
    Json(request): Json<CreateTopicsRequest>,
) -> Result<Json<Vec<Topic>>, WebError> {
    let topics = store::create_topics(&state.db, &request.names).await?;
    Ok(Json(topics))
}

/// GET /api/topics
pub async fn list_topics(State(state): State<AppState>) -> Result<Json<Vec<Topic>>, WebError> {
    let topics = store::list_topics(&state.db).await?;
    Ok(Json(topics))
}
