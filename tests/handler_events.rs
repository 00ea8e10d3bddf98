mod common;

use axum::http::StatusCode;
use common::{Actor, TestApp, assert_problem};
use serde_json::{Value, json};

async fn create_event(app: &TestApp, actor: &Actor, body: Value) -> Value {
    let response = app.post("/api/events", actor).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

fn event_body(name: &str, starts_at: &str, ends_at: &str) -> Value {
    json!({"name": name, "starts_at": starts_at, "ends_at": ends_at})
}

#[tokio::test]
async fn test_create_event_defaults_to_draft() {
    let app = TestApp::new().await;

    let body = create_event(
        &app,
        &app.acme_manager,
        event_body("Launch", "2026-03-01T18:00:00Z", "2026-03-01T22:00:00Z"),
    )
    .await;

    assert_eq!(body["status"], "draft");
    assert_eq!(body["tenant_id"], app.acme.id.to_string());
    assert!(body["venue_address_id"].is_null());
}

#[tokio::test]
async fn test_create_event_requires_manager() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/events", &app.acme_staff)
        .json(&event_body("Launch", "2026-03-01T18:00:00Z", "2026-03-01T22:00:00Z"))
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_create_event_rejects_inverted_window() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/events", &app.acme_manager)
        .json(&event_body("Backwards", "2026-03-02T00:00:00Z", "2026-03-01T00:00:00Z"))
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["ends_at"].is_array());
}

#[tokio::test]
async fn test_create_event_rejects_terminal_status() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/events", &app.acme_manager)
        .json(&json!({
            "name": "Done already",
            "starts_at": "2026-03-01T18:00:00Z",
            "ends_at": "2026-03-01T22:00:00Z",
            "status": "completed"
        }))
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["status"].is_array());
}

#[tokio::test]
async fn test_create_event_reports_field_errors() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/events", &app.acme_manager)
        .json(&event_body("", "2026-03-01T18:00:00Z", "2026-03-01T22:00:00Z"))
        .await;

    let body = assert_problem(&response, 400);
    assert_eq!(
        body["errors"]["name"][0],
        "Name must be 1-200 characters"
    );
}

#[tokio::test]
async fn test_create_event_with_venue() {
    let app = TestApp::new().await;

    let address = app
        .post("/api/addresses", &app.acme_manager)
        .json(&json!({
            "label": "Main hall",
            "line1": "1 Market Street",
            "city": "Springfield",
            "postal_code": "12345",
            "country": "US"
        }))
        .await;
    address.assert_status(StatusCode::CREATED);
    let address_id = address.json::<Value>()["id"].clone();

    let mut body = event_body("Gala", "2026-05-01T18:00:00Z", "2026-05-01T23:00:00Z");
    body["venue_address_id"] = address_id.clone();
    let event = create_event(&app, &app.acme_manager, body).await;

    assert_eq!(event["venue_address_id"], address_id);
}

#[tokio::test]
async fn test_create_event_with_foreign_venue_is_rejected() {
    let app = TestApp::new().await;

    let address = app
        .post("/api/addresses", &app.globex_admin)
        .json(&json!({
            "label": "Globex HQ",
            "line1": "2 Hill Road",
            "city": "Cypress Creek",
            "postal_code": "99999",
            "country": "US"
        }))
        .await;
    address.assert_status(StatusCode::CREATED);

    let mut body = event_body("Gala", "2026-05-01T18:00:00Z", "2026-05-01T23:00:00Z");
    body["venue_address_id"] = address.json::<Value>()["id"].clone();
    let response = app.post("/api/events", &app.acme_manager).json(&body).await;

    assert_problem(&response, 400);
}

#[tokio::test]
async fn test_status_lifecycle() {
    let app = TestApp::new().await;
    let event = create_event(
        &app,
        &app.acme_manager,
        event_body("Concert", "2026-06-01T18:00:00Z", "2026-06-01T23:00:00Z"),
    )
    .await;
    let path = format!("/api/events/{}", event["id"].as_str().unwrap());

    // Draft cannot jump straight to completed.
    let skipped = app
        .patch(&path, &app.acme_manager)
        .json(&json!({"status": "completed"}))
        .await;
    assert_problem(&skipped, 409);

    let scheduled = app
        .patch(&path, &app.acme_manager)
        .json(&json!({"status": "scheduled"}))
        .await;
    scheduled.assert_status_ok();
    assert_eq!(scheduled.json::<Value>()["status"], "scheduled");

    let completed = app
        .patch(&path, &app.acme_manager)
        .json(&json!({"status": "completed"}))
        .await;
    completed.assert_status_ok();

    let frozen = app
        .patch(&path, &app.acme_manager)
        .json(&json!({"name": "Renamed"}))
        .await;
    assert_problem(&frozen, 409);
}

#[tokio::test]
async fn test_update_event_window_is_checked_against_stored_values() {
    let app = TestApp::new().await;
    let event = create_event(
        &app,
        &app.acme_manager,
        event_body("Workshop", "2026-06-01T09:00:00Z", "2026-06-01T17:00:00Z"),
    )
    .await;

    let response = app
        .patch(
            &format!("/api/events/{}", event["id"].as_str().unwrap()),
            &app.acme_manager,
        )
        .json(&json!({"ends_at": "2026-06-01T08:00:00Z"}))
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["ends_at"].is_array());
}

#[tokio::test]
async fn test_list_events_filters() {
    let app = TestApp::new().await;
    create_event(
        &app,
        &app.acme_manager,
        event_body("Spring Fair", "2026-04-01T10:00:00Z", "2026-04-01T18:00:00Z"),
    )
    .await;
    create_event(
        &app,
        &app.acme_manager,
        json!({
            "name": "Summer Fair",
            "starts_at": "2026-07-01T10:00:00Z",
            "ends_at": "2026-07-01T18:00:00Z",
            "status": "scheduled"
        }),
    )
    .await;
    create_event(
        &app,
        &app.globex_admin,
        event_body("Globex Fair", "2026-04-01T10:00:00Z", "2026-04-01T18:00:00Z"),
    )
    .await;

    let all = app.get("/api/events", &app.acme_staff).await;
    all.assert_status_ok();
    assert_eq!(all.header("x-total-count"), "2");

    let scheduled = app
        .get("/api/events", &app.acme_staff)
        .add_query_param("status", "scheduled")
        .await;
    let body = scheduled.json::<Value>();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["name"], "Summer Fair");

    let window = app
        .get("/api/events", &app.acme_staff)
        .add_query_param("from", "2026-03-01T00:00:00Z")
        .add_query_param("to", "2026-05-01T00:00:00Z")
        .await;
    let body = window.json::<Value>();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["name"], "Spring Fair");

    let search = app
        .get("/api/events", &app.acme_staff)
        .add_query_param("search", "summer")
        .await;
    assert_eq!(search.json::<Value>()["total_count"], 1);
}

#[tokio::test]
async fn test_list_events_rejects_inverted_range() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/events", &app.acme_staff)
        .add_query_param("from", "2026-05-01T00:00:00Z")
        .add_query_param("to", "2026-03-01T00:00:00Z")
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["to"].is_array());
}

#[tokio::test]
async fn test_event_of_other_tenant_is_forbidden() {
    let app = TestApp::new().await;
    let event = create_event(
        &app,
        &app.globex_admin,
        event_body("Private", "2026-04-01T10:00:00Z", "2026-04-01T18:00:00Z"),
    )
    .await;
    let path = format!("/api/events/{}", event["id"].as_str().unwrap());

    assert_problem(&app.get(&path, &app.acme_admin).await, 403);
    assert_problem(&app.delete(&path, &app.acme_admin).await, 403);

    // A super admin can reach it directly.
    app.get(&path, &app.super_admin).await.assert_status_ok();
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new().await;
    let event = create_event(
        &app,
        &app.acme_manager,
        event_body("Temp", "2026-04-01T10:00:00Z", "2026-04-01T18:00:00Z"),
    )
    .await;
    let path = format!("/api/events/{}", event["id"].as_str().unwrap());

    app.delete(&path, &app.acme_manager)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert_problem(&app.get(&path, &app.acme_manager).await, 404);
}

#[tokio::test]
async fn test_malformed_event_id_is_rejected() {
    let app = TestApp::new().await;

    let response = app.get("/api/events/not-a-uuid", &app.acme_staff).await;

    assert_problem(&response, 400);
}
