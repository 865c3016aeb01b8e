//! Integration tests for the user-entry demo service

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::util::ServiceExt;

use refl_entry::{build_router, AppState};

fn setup_app() -> (axum::Router, AppState) {
    let state = AppState::new();
    (build_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

#[tokio::test]
async fn append_then_delete_index_zero_empties_the_list() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(post_form("/add", "first_name=Jane&last_name=Doe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fragment = extract_text(response.into_body()).await;
    assert!(fragment.contains("1 entries"));

    let response = app.clone().oneshot(delete("/delete/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(state.entries.is_empty());
}

#[tokio::test]
async fn out_of_range_delete_is_a_noop_not_an_error() {
    let (app, state) = setup_app();
    state.entries.add("Jane", "Doe");

    let response = app.oneshot(delete("/delete/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.entries.len(), 1);
}

#[tokio::test]
async fn entry_page_shows_current_count() {
    let (app, state) = setup_app();
    state.entries.add("Jane", "Doe");
    state.entries.add("John", "Smith");

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;
    assert!(html.contains("Currently DB contains 2 entries"));
}

#[tokio::test]
async fn blank_submission_adds_nothing() {
    let (app, state) = setup_app();

    let response = app
        .oneshot(post_form("/add", "first_name=&last_name=Doe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.entries.is_empty());
}

#[tokio::test]
async fn records_page_lists_entries_with_delete_buttons() {
    let (app, state) = setup_app();
    state.entries.add("Jane", "Doe");

    let response = app.oneshot(get("/records")).await.unwrap();
    let html = extract_text(response.into_body()).await;
    assert!(html.contains("Jane"));
    assert!(html.contains("Doe"));
    assert!(html.contains(r#"hx-delete="/delete/0""#));
}

#[tokio::test]
async fn empty_records_page_prompts_for_input() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get("/records")).await.unwrap();
    let html = extract_text(response.into_body()).await;
    assert!(html.contains("No records found"));
}
