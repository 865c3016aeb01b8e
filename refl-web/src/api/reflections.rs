//! Reflection resource endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use refl_common::db::{store, Reflection};
use serde::{Deserialize, Serialize};

use crate::error::WebError;
use crate::AppState;

/// Request body for POST /api/reflections
#[derive(Debug, Deserialize)]
pub struct CreateReflectionRequest {
    pub title: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub topics: Vec<String>,
    pub user_id: i64,
}

/// Response body for POST /api/reflections
#[derive(Debug, Serialize)]
pub struct CreateReflectionResponse {
    pub reflection_id: i64,
}

/// Request body for POST /api/reflections/classify
#[derive(Debug, Deserialize)]
pub struct ClassifyReflectionRequest {
    pub title: String,
    pub text: String,
    /// Accepted for parity with the create body; classification does not
    /// use it.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response body for POST /api/reflections/classify
#[derive(Debug, Serialize)]
pub struct ClassifyReflectionResponse {
    pub topics: Vec<String>,
}

/// POST /api/reflections
///
/// Stores a new reflection with caller-supplied topics; 404 if the user
/// does not exist, in which case nothing is written.
pub async fn create_reflection(
    State(state): State<AppState>,
    Json(request): Json<CreateReflectionRequest>,
) -> Result<Json<CreateReflectionResponse>, WebError> {
    let reflection_id = store::create_reflection(
        &state.db,
        &request.title,
        &request.text,
        request.timestamp,
        &request.topics,
        request.user_id,
    )
    .await?;

    Ok(Json(CreateReflectionResponse { reflection_id }))
}

/// GET /api/reflections/:id
pub async fn get_reflection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reflection>, WebError> {
    let reflection = store::get_reflection(&state.db, id).await?;
    Ok(Json(reflection))
}

/// GET /api/reflections
pub async fn list_reflections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reflection>>, WebError> {
    let reflections = store::list_reflections(&state.db).await?;
    Ok(Json(reflections))
}

/// POST /api/reflections/classify
///
/// Asks the classifier for topic names given the current topic set. A
/// classifier failure surfaces as 502; nothing is persisted either way.
pub async fn classify_reflection(
    State(state): State<AppState>,
    Json(request): Json<ClassifyReflectionRequest>,
) -> Result<Json<ClassifyReflectionResponse>, WebError> {
    let existing: Vec<String> = store::list_topics(&state.db)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    let topics = state
        .classifier
        .classify(&request.title, &request.text, &existing)
        .await?;

    Ok(Json(ClassifyReflectionResponse { topics }))
}
