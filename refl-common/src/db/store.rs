//! Data-access layer for users, topics, and reflections
//!
//! Every operation here is a single unit of work: reads run against the
//! pool directly, writes run inside one transaction that commits before
//! the function returns. A failed precondition (unknown user, duplicate
//! email) therefore never leaves a partial row behind.
//!
//! There is no update or delete: users, topics, and reflections are
//! append-only once created.

use crate::db::models::{Reflection, Topic, User};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

/// Create a new user. Fails with `Conflict` if the email is taken.
pub async fn create_user(
    pool: &SqlitePool,
    firstname: Option<&str>,
    email: &str,
) -> Result<User> {
    let mut tx = pool.begin().await?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict("Email already registered".to_string()));
    }

    let result = sqlx::query("INSERT INTO users (firstname, email) VALUES (?, ?)")
        .bind(firstname)
        .bind(email)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            // UNIQUE backstop for a concurrent insert of the same email
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Conflict("Email already registered".to_string())
            }
            _ => Error::Database(e),
        })?;
    let id = result.last_insert_rowid();

    tx.commit().await?;
    debug!(user_id = id, email = %email, "Created user");

    Ok(User {
        id,
        firstname: firstname.map(str::to_string),
        email: email.to_string(),
    })
}

/// Fetch a user by id. Fails with `NotFound` if absent.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    let row: Option<(i64, Option<String>, String)> =
        sqlx::query_as("SELECT id, firstname, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((id, firstname, email)) => Ok(User {
            id,
            firstname,
            email,
        }),
        None => Err(Error::NotFound(format!("User with id {id} not found"))),
    }
}

/// List all users, arbitrary order.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows: Vec<(i64, Option<String>, String)> =
        sqlx::query_as("SELECT id, firstname, email FROM users")
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(id, firstname, email)| User {
            id,
            firstname,
            email,
        })
        .collect())
}

/// Resolve-or-create each name, returning topics in input order.
///
/// Idempotent: resubmitting a name never creates a second row with it,
/// within one call or across calls.
pub async fn create_topics(pool: &SqlitePool, names: &[String]) -> Result<Vec<Topic>> {
    let mut tx = pool.begin().await?;
    let mut topics = Vec::with_capacity(names.len());

    for name in names {
        let topic = resolve_or_create_topic(&mut tx, name).await?;
        topics.push(topic);
    }

    tx.commit().await?;
    Ok(topics)
}

/// List all topics, arbitrary order.
pub async fn list_topics(pool: &SqlitePool) -> Result<Vec<Topic>> {
    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM topics")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| Topic { id, name })
        .collect())
}

/// Persist a new reflection bound to `user_id`, resolving-or-creating
/// each topic name and attaching it via the join table.
///
/// Fails with `NotFound` before writing anything if the user is unknown.
/// Returns the new reflection's id.
pub async fn create_reflection(
    pool: &SqlitePool,
    title: &str,
    text: &str,
    timestamp: DateTime<Utc>,
    topic_names: &[String],
    user_id: i64,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    // User existence check comes first so a bad id leaves no partial state
    let user_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user_exists.is_none() {
        return Err(Error::NotFound(format!(
            "User with id {user_id} not found"
        )));
    }

    let result = sqlx::query(
        "INSERT INTO reflections (title, text, timestamp, user_id) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(text)
    .bind(timestamp)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    let reflection_id = result.last_insert_rowid();

    for name in topic_names {
        let topic = resolve_or_create_topic(&mut tx, name).await?;
        // Duplicate names in one call hit the same (reflection, topic) key
        sqlx::query(
            "INSERT OR IGNORE INTO reflection_topics (reflection_id, topic_id) VALUES (?, ?)",
        )
        .bind(reflection_id)
        .bind(topic.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    debug!(reflection_id, user_id, "Created reflection");

    Ok(reflection_id)
}

/// Fetch a reflection with its owning user id and resolved topic names.
pub async fn get_reflection(pool: &SqlitePool, id: i64) -> Result<Reflection> {
    let row: Option<(i64, String, String, DateTime<Utc>, i64)> = sqlx::query_as(
        "SELECT id, title, text, timestamp, user_id FROM reflections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let (id, title, text, timestamp, user_id) = match row {
        Some(row) => row,
        None => return Err(Error::NotFound(format!("Reflection with id {id} not found"))),
    };

    let topics = topic_names_for(pool, id).await?;

    Ok(Reflection {
        id,
        title,
        text,
        timestamp,
        user_id,
        topics,
    })
}

/// List all reflections with their topic-name lists, arbitrary order.
///
/// Callers (the presentation layer) are responsible for sorting and
/// filtering, e.g. newest-first or by user.
pub async fn list_reflections(pool: &SqlitePool) -> Result<Vec<Reflection>> {
    let rows: Vec<(i64, String, String, DateTime<Utc>, i64)> =
        sqlx::query_as("SELECT id, title, text, timestamp, user_id FROM reflections")
            .fetch_all(pool)
            .await?;

    let mut reflections = Vec::with_capacity(rows.len());
    for (id, title, text, timestamp, user_id) in rows {
        let topics = topic_names_for(pool, id).await?;
        reflections.push(Reflection {
            id,
            title,
            text,
            timestamp,
            user_id,
            topics,
        });
    }

    Ok(reflections)
}

/// Look up a topic by exact name inside `tx`, inserting it if absent.
///
/// If the insert loses a race with a concurrent writer and trips the
/// UNIQUE constraint, re-select the winning row instead of surfacing a
/// spurious conflict.
async fn resolve_or_create_topic(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
) -> Result<Topic> {
    let existing: Option<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM topics WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
    if let Some((id, name)) = existing {
        return Ok(Topic { id, name });
    }

    let inserted = sqlx::query("INSERT INTO topics (name) VALUES (?)")
        .bind(name)
        .execute(&mut **tx)
        .await;

    match inserted {
        Ok(result) => Ok(Topic {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        }),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            let (id, name): (i64, String) =
                sqlx::query_as("SELECT id, name FROM topics WHERE name = ?")
                    .bind(name)
                    .fetch_one(&mut **tx)
                    .await?;
            Ok(Topic { id, name })
        }
        Err(e) => Err(Error::Database(e)),
    }
}

async fn topic_names_for(pool: &SqlitePool, reflection_id: i64) -> Result<Vec<String>> {
    let names: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT t.name FROM topics t
        JOIN reflection_topics rt ON rt.topic_id = t.id
        WHERE rt.reflection_id = ?
        "#,
    )
    .bind(reflection_id)
    .fetch_all(pool)
    .await?;

    Ok(names.into_iter().map(|(name,)| name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::connect_memory;

    #[tokio::test]
    async fn duplicate_email_is_conflict_and_single_row() {
        let pool = connect_memory().await.unwrap();

        create_user(&pool, Some("Jane"), "a@a.com").await.unwrap();
        let err = create_user(&pool, None, "a@a.com").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let users = list_users(&pool).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let pool = connect_memory().await.unwrap();
        let err = get_user(&pool, 42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn nullable_firstname_round_trips() {
        let pool = connect_memory().await.unwrap();
        let created = create_user(&pool, None, "anon@a.com").await.unwrap();
        let fetched = get_user(&pool, created.id).await.unwrap();
        assert_eq!(fetched.firstname, None);
        assert_eq!(fetched.email, "anon@a.com");
    }

    #[tokio::test]
    async fn repeated_topic_names_resolve_to_same_id() {
        let pool = connect_memory().await.unwrap();

        let first = create_topics(&pool, &["x".to_string(), "x".to_string()])
            .await
            .unwrap();
        let second = create_topics(&pool, &["x".to_string()]).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, first[1].id);
        assert_eq!(first[0].id, second[0].id);

        let all = list_topics(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "x");
    }

    #[tokio::test]
    async fn topic_names_are_case_sensitive() {
        let pool = connect_memory().await.unwrap();
        create_topics(&pool, &["Health".to_string(), "health".to_string()])
            .await
            .unwrap();
        assert_eq!(list_topics(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_reflection_unknown_user_leaves_no_orphan() {
        let pool = connect_memory().await.unwrap();

        let err = create_reflection(&pool, "T", "B", Utc::now(), &[], 99)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(list_reflections(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reflection_round_trip() {
        let pool = connect_memory().await.unwrap();
        let user = create_user(&pool, Some("Jane"), "a@a.com").await.unwrap();

        let t = Utc::now();
        let id = create_reflection(
            &pool,
            "T",
            "B",
            t,
            &["a".to_string(), "b".to_string()],
            user.id,
        )
        .await
        .unwrap();

        let r = get_reflection(&pool, id).await.unwrap();
        assert_eq!(r.title, "T");
        assert_eq!(r.text, "B");
        assert_eq!(r.user_id, user.id);
        let mut topics = r.topics.clone();
        topics.sort();
        assert_eq!(topics, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_topic_names_in_one_reflection_attach_once() {
        let pool = connect_memory().await.unwrap();
        let user = create_user(&pool, None, "a@a.com").await.unwrap();

        let id = create_reflection(
            &pool,
            "T",
            "B",
            Utc::now(),
            &["a".to_string(), "a".to_string()],
            user.id,
        )
        .await
        .unwrap();

        let r = get_reflection(&pool, id).await.unwrap();
        assert_eq!(r.topics, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn list_reflections_is_stable_between_reads() {
        let pool = connect_memory().await.unwrap();
        let user = create_user(&pool, None, "a@a.com").await.unwrap();
        for n in 0..3 {
            create_reflection(&pool, &format!("t{n}"), "b", Utc::now(), &[], user.id)
                .await
                .unwrap();
        }

        let ids = |rs: Vec<Reflection>| rs.into_iter().map(|r| r.id).collect::<Vec<_>>();
        let first = ids(list_reflections(&pool).await.unwrap());
        let second = ids(list_reflections(&pool).await.unwrap());
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[tokio::test]
    async fn get_reflection_not_found() {
        let pool = connect_memory().await.unwrap();
        let err = get_reflection(&pool, 7).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
