//! HTTP API handlers for refl-web

pub mod health;
pub mod reflections;
pub mod topics;
pub mod users;

pub use health::health_routes;
pub use reflections::{
    classify_reflection, create_reflection, get_reflection, list_reflections,
};
pub use topics::{create_topics, list_topics};
pub use users::{create_user, get_user, list_users};
