//! User resource endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use refl_common::db::{store, User};
use serde::Deserialize;

use crate::error::WebError;
use crate::AppState;

/// Request body for POST /api/users
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Optional display name
    #[serde(default)]
    pub firstname: Option<String>,
    pub email: String,
}

/// POST /api/users
///
/// Creates a user; 400 if the email is already registered.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, WebError> {
    let user = store::create_user(&state.db, request.firstname.as_deref(), &request.email).await?;
    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, WebError> {
    let user = store::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, WebError> {
    let users = store::list_users(&state.db).await?;
    Ok(Json(users))
}
