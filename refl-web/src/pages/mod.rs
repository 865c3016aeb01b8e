//! Server-rendered pages
//!
//! List, detail, and new-entry views calling the data-access layer
//! in-process. Sorting and filtering of reflections happens here, not in
//! the store.

pub mod html;

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::error::WebError;
use crate::AppState;
use html::{escape, page_layout};
use refl_common::db::{store, User};

/// GET /
///
/// The root redirects to the reflections list.
pub async fn home() -> Redirect {
    Redirect::to("/reflections")
}

/// Query parameters for the list page
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "all", absent, or a user id; unparseable values mean no filter
    pub user_id: Option<String>,
}

/// Form body for POST /reflections/create
#[derive(Debug, Deserialize)]
pub struct NewReflectionForm {
    pub user_id: i64,
    pub title: String,
    pub text: String,
}

fn display_name(user: &User) -> &str {
    user.firstname.as_deref().unwrap_or(&user.email)
}

/// GET /reflections
///
/// All reflections newest-first, with a filter-by-user dropdown.
pub async fn reflections_list_page(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, WebError> {
    let users = store::list_users(&state.db).await?;
    let mut reflections = store::list_reflections(&state.db).await?;

    let filter_uid = match query.user_id.as_deref() {
        Some("all") | None => None,
        Some(raw) => raw.parse::<i64>().ok(),
    };
    if let Some(uid) = filter_uid {
        reflections.retain(|r| r.user_id == uid);
    }
    reflections.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let user_names: HashMap<i64, String> = users
        .iter()
        .map(|u| (u.id, display_name(u).to_string()))
        .collect();

    let mut options = String::from(r#"<option value="all">All Users</option>"#);
    for user in &users {
        let selected = if filter_uid == Some(user.id) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            user.id,
            escape(display_name(user))
        ));
    }

    let mut cards = String::new();
    for r in &reflections {
        let author = user_names
            .get(&r.user_id)
            .map(String::as_str)
            .unwrap_or("Unknown");
        let topic_items: String = r
            .topics
            .iter()
            .map(|t| format!("<li>{}</li>", escape(t)))
            .collect();
        cards.push_str(&format!(
            r#"<a href="/reflections/{}"><div class="card">
<h3>{}</h3>
<small>By {}, {}</small>
<ul>{topic_items}</ul>
</div></a>
"#,
            r.id,
            escape(&r.title),
            escape(author),
            r.timestamp.format("%Y-%m-%d"),
        ));
    }

    let content = format!(
        r#"<h1>All Reflections</h1>
<form action="/reflections" method="get">
<label>Filter by User:</label>
<select name="user_id" id="user_id">{options}</select>
<button type="submit">Filter</button>
</form>
<hr>
<div id="reflection-list">
{cards}</div>"#
    );

    Ok(Html(page_layout("All Reflections", &content)))
}

/// GET /reflections/new
///
/// Entry form with a user dropdown; submission runs the
/// classify-then-create flow.
pub async fn new_reflection_page(
    State(state): State<AppState>,
) -> Result<Html<String>, WebError> {
    let users = store::list_users(&state.db).await?;

    let options: String = users
        .iter()
        .map(|u| {
            format!(
                r#"<option value="{}">{} (ID: {})</option>"#,
                u.id,
                escape(display_name(u)),
                u.id
            )
        })
        .collect();

    let content = format!(
        r#"<h1>Add New Reflection</h1>
<form action="/reflections/create" method="post">
<label for="user_id">Select User</label>
<select name="user_id" id="user_id">{options}</select>
<label for="title">Title</label>
<input name="title" id="title" placeholder="Reflection Title">
<label for="text">Text</label>
<textarea name="text" id="text" placeholder="Write your reflection..."></textarea>
<button type="submit">Submit Reflection</button>
</form>"#
    );

    Ok(Html(page_layout("Add New Reflection", &content)))
}

/// GET /reflections/:id
///
/// Single reflection with author, timestamp, topics, and body. A missing
/// id renders a friendly not-found page rather than a JSON error.
pub async fn reflection_detail_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let reflection = match store::get_reflection(&state.db, id).await {
        Ok(r) => r,
        Err(refl_common::Error::NotFound(_)) => {
            let page = page_layout("Not Found", "<h1>Reflection not found.</h1>");
            return Ok((StatusCode::NOT_FOUND, Html(page)).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let user = store::get_user(&state.db, reflection.user_id).await?;

    let topic_items: String = reflection
        .topics
        .iter()
        .map(|t| format!("<li>{}</li>", escape(t)))
        .collect();

    let content = format!(
        r#"<h1>{}</h1>
<p>By {} on {}</p>
<h3>Topics:</h3>
<ul>{topic_items}</ul>
<hr>
<p>{}</p>"#,
        escape(&reflection.title),
        escape(display_name(&user)),
        reflection.timestamp.format("%Y-%m-%d %H:%M"),
        escape(&reflection.text),
    );

    Ok(Html(page_layout(&reflection.title, &content)).into_response())
}

/// POST /reflections/create
///
/// Form handler for the whole creation flow: classify, persist with the
/// suggested topics, then redirect back to the list.
pub async fn create_reflection_handler(
    State(state): State<AppState>,
    Form(form): Form<NewReflectionForm>,
) -> Result<Redirect, WebError> {
    crate::services::create_reflection_with_classification(
        &state,
        form.user_id,
        &form.title,
        &form.text,
    )
    .await?;

    Ok(Redirect::to("/reflections"))
}
