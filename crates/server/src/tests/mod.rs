// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use critterbase_taxonomy::InMemoryAuthority;
use serde_json::{Value, json};
use tower::ServiceExt;

const CERVIDAE: i64 = 180_692;
const MOOSE: i64 = 180_703;
const WOLF: i64 = 180_596;

fn test_authority() -> InMemoryAuthority {
    InMemoryAuthority::new()
        .with_taxon(202_423, "Animalia", &[])
        .with_taxon(CERVIDAE, "Cervidae", &[202_423])
        .with_taxon(MOOSE, "Alces alces", &[202_423, CERVIDAE])
        .with_taxon(180_593, "Canidae", &[202_423])
        .with_taxon(WOLF, "Canis lupus", &[202_423, 180_593])
}

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    create_test_app_state_with(test_authority(), BulkOptions::default())
}

fn create_test_app_state_with(authority: InMemoryAuthority, options: BulkOptions) -> AppState {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, Arc::new(authority), options)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
) -> (HttpStatusCode, Value) {
    let request: Request<Body> = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn add_body_location(app_state: &AppState, owner: i64, name: &str) -> Uuid {
    app_state
        .persistence
        .lock()
        .await
        .add_marking_body_location(TaxonId::new(owner), name, None)
        .unwrap()
        .taxon_marking_body_location_id
}

#[tokio::test]
async fn test_bulk_create_reports_counts() {
    let app: Router = build_router(create_test_app_state());
    let critter_id: Uuid = Uuid::new_v4();

    let (status, body) = send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({
            "critters": [{ "critter_id": critter_id, "itis_tsn": MOOSE, "sex": "Female" }],
            "captures": [{
                "critter_id": critter_id,
                "capture_timestamp": "2026-02-14T09:30:00Z",
                "capture_location": { "latitude": 52.1, "longitude": -124.3 }
            }]
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["counts"]["created"]["critters"], json!(1));
    assert_eq!(body["counts"]["created"]["captures"], json!(1));
}

#[tokio::test]
async fn test_bulk_create_fills_scientific_name() {
    let app: Router = build_router(create_test_app_state());
    let critter_id: Uuid = Uuid::new_v4();

    send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "critters": [{ "critter_id": critter_id, "itis_tsn": MOOSE }] })),
    )
    .await;
    let (status, body) = send(&app, "GET", &format!("/api/critters/{critter_id}"), None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["itis_scientific_name"], json!("Alces alces"));
    assert_eq!(body["captures"], json!([]));
}

#[tokio::test]
async fn test_bulk_create_with_unknown_taxon_returns_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "critters": [{ "itis_tsn": 999_999 }] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));
}

#[tokio::test]
async fn test_bulk_create_with_invalid_latitude_returns_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "locations": [{ "latitude": 95.0, "longitude": 0.0 }] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("locations[0].latitude")
    );
}

#[tokio::test]
async fn test_bulk_create_when_authority_is_down_returns_bad_gateway() {
    let app: Router = build_router(create_test_app_state_with(
        test_authority().unreachable(),
        BulkOptions::default(),
    ));

    let (status, _) = send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "critters": [{ "itis_tsn": MOOSE }] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_bulk_create_over_budget_returns_gateway_timeout() {
    let app: Router = build_router(create_test_app_state_with(
        test_authority(),
        BulkOptions {
            time_budget: Duration::ZERO,
        },
    ));

    let (status, _) = send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "critters": [{ "itis_tsn": MOOSE }] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_bulk_update_of_missing_critter_returns_not_found() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/bulk",
        Some(&json!({
            "updates": { "critters": [{ "critter_id": Uuid::new_v4(), "wlh_id": "21-0002" }] }
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_update_applies_deletes_in_same_request() {
    let app_state: AppState = create_test_app_state();
    let ear: Uuid = add_body_location(&app_state, CERVIDAE, "Left ear").await;
    let app: Router = build_router(app_state);
    let critter_id: Uuid = Uuid::new_v4();
    let marking_id: Uuid = Uuid::new_v4();
    send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({
            "critters": [{ "critter_id": critter_id, "itis_tsn": MOOSE }],
            "markings": [{
                "marking_id": marking_id,
                "critter_id": critter_id,
                "taxon_marking_body_location_id": ear
            }]
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/bulk",
        Some(&json!({
            "updates": { "critters": [{ "critter_id": critter_id, "animal_id": "moose-7" }] },
            "deletes": { "markings": [marking_id] }
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["counts"]["updated"]["critters"], json!(1));
    assert_eq!(body["counts"]["deleted"]["markings"], json!(1));
}

#[tokio::test]
async fn test_bulk_delete_of_missing_row_returns_not_found() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/bulk",
        Some(&json!({ "captures": [Uuid::new_v4()] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_markings_reports_foreign_body_locations() {
    let app_state: AppState = create_test_app_state();
    let ear: Uuid = add_body_location(&app_state, CERVIDAE, "Left ear").await;
    let app: Router = build_router(app_state);
    let critter_id: Uuid = Uuid::new_v4();
    let marking_id: Uuid = Uuid::new_v4();
    send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({
            "critters": [{ "critter_id": critter_id, "itis_tsn": MOOSE }],
            "markings": [{
                "marking_id": marking_id,
                "critter_id": critter_id,
                "taxon_marking_body_location_id": ear
            }]
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/markings/verify",
        Some(&json!({ "itis_tsn": WOLF, "markings": [marking_id] })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["verified"], json!(false));
    assert_eq!(body["invalid_markings"], json!([marking_id]));

    let (_, body) = send(
        &app,
        "POST",
        "/api/markings/verify",
        Some(&json!({ "itis_tsn": MOOSE, "markings": [marking_id] })),
    )
    .await;

    assert_eq!(body["verified"], json!(true));
}

#[tokio::test]
async fn test_taxon_definitions_are_inherited() {
    let app_state: AppState = create_test_app_state();
    add_body_location(&app_state, CERVIDAE, "Left ear").await;
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/xref/taxon-definitions?tsn={MOOSE}&kind=marking_body_location"),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["definitions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_taxon_definitions_none_returns_not_found() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/xref/taxon-definitions?tsn={WOLF}&kind=qualitative_measurement"),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_taxon_hierarchy() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/taxonomy/hierarchy/{MOOSE}"),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["hierarchy"], json!([202_423, CERVIDAE, MOOSE]));
}

#[tokio::test]
async fn test_taxon_search_blank_name_returns_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(&app, "GET", "/api/taxonomy/search?name=", None).await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_taxon_search_by_name() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) =
        send(&app, "GET", "/api/taxonomy/search?name=Canis%20lupus", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["taxa"][0]["tsn"], json!(WOLF));
}

#[tokio::test]
async fn test_get_missing_critter_returns_not_found() {
    let app: Router = build_router(create_test_app_state());

    let uri: String = format!("/api/critters/{}", Uuid::new_v4());
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    let error_response: ErrorResponse = serde_json::from_value(body).unwrap();
    assert!(error_response.error);
}

#[tokio::test]
async fn test_create_capture_mirrors_location() {
    let app: Router = build_router(create_test_app_state());
    let critter_id: Uuid = Uuid::new_v4();
    send(
        &app,
        "POST",
        "/api/bulk",
        Some(&json!({ "critters": [{ "critter_id": critter_id, "itis_tsn": MOOSE }] })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/captures",
        Some(&json!({
            "critter_id": critter_id,
            "capture_timestamp": "2026-02-14T09:30:00Z",
            "capture_location": { "latitude": 52.1, "longitude": -124.3 }
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert!(!body["capture_location_id"].is_null());
    assert_eq!(body["capture_location_id"], body["release_location_id"]);
}
