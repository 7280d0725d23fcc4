use std::collections::HashSet;

use axum::{body::Body, http::Request};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

const FULL_ORDER: [&str; 7] = [
    "OB-007", "OB-002", "OB-001", "OB-005", "OB-006", "OB-003", "OB-004",
];

#[tokio::test]
async fn consecutive_pages_are_disjoint_prefixes_of_the_full_order() {
    let (app, _store) = test_app();
    let mut seen = Vec::new();

    for page in 1..=3 {
        let (_, body) = search(&app, json!({ "page": page, "pageSize": 3 })).await;
        let page_refs = refs(&body);
        assert!(page_refs.len() <= 3);
        assert_eq!(body["totalCount"], 7);
        seen.extend(page_refs);
    }

    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(seen, FULL_ORDER);
}

#[tokio::test]
async fn results_are_ordered_by_surname_then_given_names() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({})).await;

    let keys: Vec<(String, String)> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["surname"].as_str().unwrap().to_string(),
                r["givenNames"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn ties_are_broken_by_reference() {
    let dupes = vec![
        server::store::memory::ObituaryRecord::new("OB-B", "Smith", "Ann"),
        server::store::memory::ObituaryRecord::new("OB-A", "Smith", "Ann"),
        server::store::memory::ObituaryRecord::new("OB-C", "Smith", "Ann"),
    ];
    let (app, _store) = test_app_with(dupes, 10);

    let (_, first) = search(&app, json!({ "pageSize": 2 })).await;
    let (_, second) = search(&app, json!({ "page": 2, "pageSize": 2 })).await;
    assert_eq!(refs(&first), vec!["OB-A", "OB-B"]);
    assert_eq!(refs(&second), vec!["OB-C"]);
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_full_count() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({ "page": 5, "pageSize": 3 })).await;
    assert_eq!(refs(&body), Vec::<String>::new());
    assert_eq!(body["totalCount"], 7);
}

#[tokio::test]
async fn huge_page_number_reads_empty_with_full_count() {
    let (app, _store) = test_app();
    let (status, body) = search(
        &app,
        json!({ "page": 4_611_686_018_427_387_904_i64, "pageSize": 10 }),
    )
    .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(refs(&body), Vec::<String>::new());
    assert_eq!(body["totalCount"], 7);
    assert_eq!(body["isPartialMatch"], false);
}

#[tokio::test]
async fn largest_page_and_page_size_do_not_overflow() {
    let (app, _store) = test_app();
    let (status, body) = search(&app, json!({ "page": i64::MAX, "pageSize": i64::MAX })).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(refs(&body), Vec::<String>::new());
    assert_eq!(body["totalCount"], 7);
}

#[tokio::test]
async fn omitted_page_size_uses_configured_default() {
    let (app, _store) = test_app_with(fixture(), 2);
    let (_, body) = search(&app, json!({ "surname": "Anderson" })).await;
    assert_eq!(refs(&body), vec!["OB-007", "OB-002"]);
    assert_eq!(body["totalCount"], 3);
}

#[tokio::test]
async fn identical_requests_return_identical_bytes() {
    let (app, _store) = test_app();
    let payload = json!({ "surname": "Smith", "givenNames": "Karl", "pageSize": 2 }).to_string();

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/api/obituaries/search")
            .header("content-type", "application/json")
            .body(Body::from(payload.clone()))
            .unwrap()
    };

    let (_, first) = send_raw(&app, request()).await;
    let (_, second) = send_raw(&app, request()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn result_rows_carry_projected_columns() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({ "maidenName": "Larsen" })).await;
    let row = &body["results"][0];

    assert_eq!(row["reference"], "OB-002");
    assert_eq!(row["givenNames"], "Ingrid");
    assert_eq!(row["surname"], "Anderson");
    assert_eq!(row["maidenName"], "Larsen");
    assert_eq!(row["birthDate"], "1934-02-28T00:00:00Z");
    assert_eq!(row["deathDate"], "2005-06-15T00:00:00Z");
}
