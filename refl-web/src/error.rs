//! HTTP error mapping for the Reflections web service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;

/// Errors surfaced by handlers, mapped onto the HTTP status taxonomy:
/// missing ids are 404, duplicate email is 400, a failed classifier call
/// is 502 (propagated, never retried), everything else is 500.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Store(#[from] refl_common::Error),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::Store(refl_common::Error::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            WebError::Store(refl_common::Error::Conflict(msg)) => (StatusCode::BAD_REQUEST, msg),
            WebError::Store(e) => {
                tracing::error!("Store error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            WebError::Classifier(e) => {
                tracing::error!("Classifier call failed: {e}");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = WebError::from(refl_common::Error::NotFound("User with id 9".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_400() {
        let err = WebError::from(refl_common::Error::Conflict("Email already registered".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn classifier_failure_maps_to_502() {
        let err = WebError::from(ClassifierError::Network("timed out".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
