//! Create-with-classification orchestration
//!
//! Composes the classifier adapter and the data-access layer for the
//! "new reflection" use case: classify first, then persist with the
//! suggested topics. Classification has no side effect, so a creation
//! failure after a successful classification needs no compensation - the
//! suggestion is simply discarded.

use chrono::Utc;
use tracing::info;

use crate::error::WebError;
use crate::AppState;
use refl_common::db::store;

/// Classify a reflection against the current topic set, then persist it
/// with the suggested topic names. Returns the new reflection's id.
///
/// One timestamp is captured at the start of the flow and reused for the
/// persisted row, so classification and creation observe the same time.
pub async fn create_reflection_with_classification(
    state: &AppState,
    user_id: i64,
    title: &str,
    text: &str,
) -> Result<i64, WebError> {
    let timestamp = Utc::now();

    let existing: Vec<String> = store::list_topics(&state.db)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    let topics = state.classifier.classify(title, text, &existing).await?;

    let reflection_id =
        store::create_reflection(&state.db, title, text, timestamp, &topics, user_id).await?;

    info!(reflection_id, user_id, topics = ?topics, "Created reflection with classified topics");
    Ok(reflection_id)
}
