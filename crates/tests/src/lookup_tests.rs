use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use crate::common::*;

// ── Lookup by reference ─────────────────────────────────────────────

#[tokio::test]
async fn get_obituary_by_reference() {
    let (app, _store) = test_app();
    let (status, body) = get_json(&app, "/api/obituaries/OB-003").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["surname"], "Smith");
    assert_eq!(body["givenNames"], "John");
    assert_eq!(body["deathDate"], "1990-06-01T00:00:00Z");
}

#[tokio::test]
async fn unknown_reference_is_not_found() {
    let (app, _store) = test_app();
    let (status, body) = get_json(&app, "/api/obituaries/OB-999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
}

// ── Relationships ───────────────────────────────────────────────────

#[tokio::test]
async fn relationships_are_listed_by_name() {
    let (app, _store) = test_app();
    let (status, body) = get_json(&app, "/api/relationships").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": DAUGHTER, "name": "Daughter" },
            { "id": SON, "name": "Son" },
            { "id": SPOUSE, "name": "Spouse" }
        ])
    );
}

// ── Store failures ──────────────────────────────────────────────────

#[tokio::test]
async fn store_failure_during_search_is_opaque() {
    let (app, store) = test_app();
    store.set_unavailable(true);

    let (status, body) = search(&app, json!({ "surname": "Smith" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "InternalError");
    assert_eq!(body["message"], "Search failed");
}

#[tokio::test]
async fn store_failure_during_lookup_hides_detail() {
    let (app, store) = test_app();
    store.set_unavailable(true);

    let (status, body) = get_json(&app, "/api/obituaries/OB-001").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "DatabaseError");
    assert!(!body["message"].as_str().unwrap().contains("memory store"));
}

#[tokio::test]
async fn invalid_input_is_reported_before_the_store_is_touched() {
    let (app, store) = test_app();
    store.set_unavailable(true);

    let (status, _) = search(&app, json!({ "birthYear": "19" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Health & middleware ─────────────────────────────────────────────

#[tokio::test]
async fn health_reports_store_status() {
    let (app, store) = test_app();

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "connected");

    store.set_unavailable(true);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["store"].as_str().unwrap().starts_with("error"));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (app, _store) = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/api/relationships")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn supplied_request_id_is_propagated() {
    let (app, _store) = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
