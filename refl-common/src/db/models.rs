//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered author of reflections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Optional display name; rendering falls back to the email
    pub firstname: Option<String>,
    pub email: String,
}

/// A descriptive tag, globally unique by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
}

/// A journal entry with its owning user and resolved topic names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
    pub topics: Vec<String>,
}
