//! refl-web library - Reflections journaling service
//!
//! JSON API under `/api` plus server-rendered pages, both backed by the
//! same data-access layer in refl-common.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod classifier;
pub mod error;
pub mod pages;
pub mod services;

use classifier::TopicClassifier;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Topic classifier behind a trait object so tests can stub it
    pub classifier: Arc<dyn TopicClassifier>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, classifier: Arc<dyn TopicClassifier>) -> Self {
        Self { db, classifier }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // JSON resource endpoints
    let api = Router::new()
        .route("/api/users", get(api::list_users).post(api::create_user))
        .route("/api/users/:id", get(api::get_user))
        .route("/api/topics", get(api::list_topics).post(api::create_topics))
        .route(
            "/api/reflections",
            get(api::list_reflections).post(api::create_reflection),
        )
        .route("/api/reflections/:id", get(api::get_reflection))
        .route("/api/reflections/classify", post(api::classify_reflection));

    // Server-rendered pages call the data-access layer in-process
    let ui = Router::new()
        .route("/", get(pages::home))
        .route("/reflections", get(pages::reflections_list_page))
        .route("/reflections/new", get(pages::new_reflection_page))
        .route("/reflections/create", post(pages::create_reflection_handler))
        .route("/reflections/:id", get(pages::reflection_detail_page));

    Router::new()
        .merge(api)
        .merge(ui)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
