use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

// ── Exact mode ──────────────────────────────────────────────────────

#[tokio::test]
async fn full_exact_date_matches_the_day() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "exact", "birthYear": "1931", "birthMonth": "05", "birthDay": "4" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-001"]);
}

#[tokio::test]
async fn invalid_day_degrades_to_whole_month() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "exact", "birthYear": "1950", "birthMonth": "2", "birthDay": "31" }),
    )
    .await;

    // Feb 1 and Feb 28 1950 are both inside the month.
    assert_eq!(refs(&body), vec!["OB-005", "OB-006"]);
    assert_eq!(body["totalCount"], 2);
}

#[tokio::test]
async fn month_without_day_covers_the_month() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "deathDateType": "exact", "deathYear": "1990", "deathMonth": "6" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-003", "OB-004"]);
}

#[tokio::test]
async fn year_only_covers_through_december_31() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({ "birthDateType": "exact", "birthYear": "1920" })).await;
    assert_eq!(refs(&body), vec!["OB-004"]);
}

#[tokio::test]
async fn invalid_month_degrades_to_year() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "exact", "birthYear": "1960", "birthMonth": "13", "birthDay": "1" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-007"]);
}

#[tokio::test]
async fn exact_mode_without_year_adds_no_condition() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "exact", "birthMonth": "2", "birthYearFrom": "1950" }),
    )
    .await;
    assert_eq!(body["totalCount"], 7);
}

// ── Range mode ──────────────────────────────────────────────────────

#[tokio::test]
async fn closed_range_is_inclusive_of_whole_years() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "range", "birthYearFrom": "1930", "birthYearTo": "1934" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-002", "OB-001"]);
}

#[tokio::test]
async fn lower_bound_only() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "range", "birthYearFrom": "1950" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-007", "OB-005", "OB-006"]);
}

#[tokio::test]
async fn upper_bound_only() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({ "birthDateType": "range", "birthYearTo": "1919" })).await;
    assert_eq!(refs(&body), vec!["OB-003"]);
}

#[tokio::test]
async fn inverted_range_matches_nothing() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "birthDateType": "range", "birthYearFrom": "1960", "birthYearTo": "1900" }),
    )
    .await;
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["isPartialMatch"], false);
}

#[tokio::test]
async fn range_mode_ignores_exact_fields() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "deathDateType": "range", "deathYear": "1990", "deathYearFrom": "2000" }),
    )
    .await;
    assert_eq!(refs(&body), vec!["OB-002", "OB-005"]);
}

#[tokio::test]
async fn records_without_a_date_never_match_a_date_facet() {
    let (app, _store) = test_app();
    let (_, body) = search(
        &app,
        json!({ "deathDateType": "range", "deathYearFrom": "1000", "deathYearTo": "2999" }),
    )
    .await;
    // Robert and Erik have no death date.
    assert_eq!(body["totalCount"], 5);
}

#[tokio::test]
async fn date_fields_without_mode_are_ignored() {
    let (app, _store) = test_app();
    let (_, body) = search(&app, json!({ "birthYear": "1931" })).await;
    assert_eq!(body["totalCount"], 7);
}
