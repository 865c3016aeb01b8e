//! refl-entry library - standalone user-entry demo service
//!
//! Two pages over an in-memory entry list: an input form with a live
//! status line, and a records table with per-row delete. Mutations go
//! through htmx fragment swaps rather than full page loads.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub mod store;

use store::EntryStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Entry list living for the lifetime of the process
    pub entries: Arc<EntryStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(EntryStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .route("/", get(entry_page))
        .route("/add", post(add_entry))
        .route("/records", get(records_page))
        .route("/delete/:index", delete(delete_entry))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Form body for POST /add
#[derive(Debug, Deserialize)]
pub struct AddEntryForm {
    pub first_name: String,
    pub last_name: String,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{}</title>
<script src="https://unpkg.com/htmx.org@1.9.10"></script>
<style>
body {{ font-family: system-ui, -apple-system, sans-serif; max-width: 700px; margin: 0 auto; padding: 20px; }}
h1 {{ text-align: center; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ padding: 8px 16px; border-bottom: 1px solid #ddd; text-align: left; }}
button {{ padding: 6px 12px; cursor: pointer; }}
</style>
</head>
<body>
{content}
</body>
</html>"#,
        escape(title)
    )
}

fn status_fragment(count: usize) -> String {
    format!(r#"<div id="status">Currently DB contains {count} entries</div>"#)
}

/// GET /
///
/// Entry form plus the current count status line.
pub async fn entry_page(State(state): State<AppState>) -> Html<String> {
    let content = format!(
        r##"<h1>User Entry</h1>
<form hx-post="/add" hx-target="#status" hx-swap="outerHTML" hx-on::after-request="this.reset()">
<label for="first_name">First Name</label>
<input name="first_name" id="first_name" placeholder="e.g., Jane">
<label for="last_name">Last Name</label>
<input name="last_name" id="last_name" placeholder="e.g., Doe">
<button type="submit">Submit &gt;</button>
</form>
<hr>
<h3>Activity &amp; Status</h3>
{}
<a href="/records">View All Entries</a>"##,
        status_fragment(state.entries.len())
    );

    Html(page_layout("User Entry", &content))
}

/// POST /add
///
/// Appends an entry when both names are filled in, then returns the
/// refreshed status fragment for the htmx swap.
pub async fn add_entry(
    State(state): State<AppState>,
    Form(form): Form<AddEntryForm>,
) -> Html<String> {
    state.entries.add(&form.first_name, &form.last_name);
    Html(status_fragment(state.entries.len()))
}

/// DELETE /delete/:index
///
/// Removes an entry by table position; out-of-range is a no-op. The
/// empty body tells htmx to drop the row from the DOM.
pub async fn delete_entry(State(state): State<AppState>, Path(index): Path<usize>) -> Html<String> {
    state.entries.remove(index);
    Html(String::new())
}

/// GET /records
///
/// Table of all entries with a delete button per row.
pub async fn records_page(State(state): State<AppState>) -> Html<String> {
    let entries = state.entries.snapshot();

    let content = if entries.is_empty() {
        r#"<h1>User Records</h1>
<p>No records found. Add some users first!</p>
<a href="/">&lt; Back to Input</a>"#
            .to_string()
    } else {
        let rows: String = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                format!(
                    r#"<tr id="user-row-{index}">
<td>{}</td>
<td>{}</td>
<td><button hx-delete="/delete/{index}" hx-target="closest tr" hx-swap="outerHTML swap:0.5s">X</button></td>
</tr>
"#,
                    escape(&entry.first),
                    escape(&entry.last)
                )
            })
            .collect();

        format!(
            r#"<h1>User Records</h1>
<table>
<thead>
<tr><th>FIRST NAME</th><th>LAST NAME</th><th>ACTION</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
<a href="/">&lt; Back to Input</a>"#
        )
    };

    Html(page_layout("User Records", &content))
}
