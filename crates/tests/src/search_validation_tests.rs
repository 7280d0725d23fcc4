use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn two_digit_year_is_rejected() {
    let (app, _store) = test_app();
    let (status, body) = search(&app, json!({ "birthDateType": "exact", "birthYear": "50" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationError");
    assert_eq!(body["field_errors"]["birthYear"], "Must be exactly 4 digits");
}

#[tokio::test]
async fn three_digit_day_is_rejected() {
    let (app, _store) = test_app();
    let (status, body) = search(&app, json!({ "deathDay": "123" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field_errors"]["deathDay"], "Must be 1 or 2 digits");
}

#[tokio::test]
async fn non_numeric_range_year_is_rejected() {
    let (app, _store) = test_app();
    let (status, body) = search(
        &app,
        json!({ "birthDateType": "range", "birthYearFrom": "19x0", "birthYearTo": "2000" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("birthYearFrom").is_some());
    assert!(body["field_errors"].get("birthYearTo").is_none());
}

#[tokio::test]
async fn every_invalid_field_is_reported() {
    let (app, _store) = test_app();
    let (status, body) = search(
        &app,
        json!({ "page": 0, "pageSize": -1, "birthMonth": "abc" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = body["field_errors"].as_object().unwrap();
    assert!(fields.contains_key("page"));
    assert!(fields.contains_key("pageSize"));
    assert!(fields.contains_key("birthMonth"));
}

#[tokio::test]
async fn nested_relative_error_is_indexed() {
    let (app, _store) = test_app();
    let (status, body) = search(
        &app,
        json!({ "relatives": [{ "name": "Ann" }, { "relationshipId": 0 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["field_errors"]["relatives[1].relationshipId"],
        "Relationship id must be positive"
    );
}

#[tokio::test]
async fn wrongly_typed_field_is_a_validation_error() {
    let (app, _store) = test_app();
    let (status, body) = search(&app, json!({ "page": "one" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationError");
}

#[tokio::test]
async fn unknown_date_mode_is_a_validation_error() {
    let (app, _store) = test_app();
    let (status, _) = search(&app, json!({ "birthDateType": "sometime" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _store) = test_app();
    let (status, body) = post_json(&app, "/api/obituaries/search", "{\"surname\":").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
}

#[tokio::test]
async fn empty_object_is_a_valid_search() {
    let (app, _store) = test_app();
    let (status, body) = search(&app, json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 7);
    assert_eq!(body["isPartialMatch"], false);
}
