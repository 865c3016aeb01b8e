//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently, so a fresh deployment needs no manual setup step.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_and_migrate(&pool).await?;
    Ok(pool)
}

/// Connect to a private in-memory database with the full schema.
///
/// Used by integration tests; each call returns an isolated store.
pub async fn connect_memory() -> Result<SqlitePool> {
    // A single pinned connection: each sqlite::memory: connection is its
    // own database, so the pool must never drop or add connections.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    configure_and_migrate(&pool).await?;
    Ok(pool)
}

async fn configure_and_migrate(pool: &SqlitePool) -> Result<()> {
    // Enforce the reflections.user_id foreign key at the store level
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // Migrations are idempotent - safe to call on every startup
    create_users_table(pool).await?;
    create_topics_table(pool).await?;
    create_reflections_table(pool).await?;
    create_reflection_topics_table(pool).await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            firstname TEXT,
            email TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_topics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS topics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_reflections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reflections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_reflection_topics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reflection_topics (
            reflection_id INTEGER NOT NULL REFERENCES reflections(id),
            topic_id INTEGER NOT NULL REFERENCES topics(id),
            PRIMARY KEY (reflection_id, topic_id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_database_file_and_reopens_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refl.db");

        let pool = init_database(&path).await.unwrap();
        assert!(path.exists());
        pool.close().await;

        // Second startup against the existing file must succeed
        let pool = init_database(&path).await.unwrap();
        sqlx::query("SELECT COUNT(*) FROM reflection_topics")
            .fetch_one(&pool)
            .await
            .unwrap();
    }
}
