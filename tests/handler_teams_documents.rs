mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_problem};
use serde_json::{Value, json};

async fn create_event(app: &TestApp) -> String {
    let response = app
        .post("/api/events", &app.acme_manager)
        .json(&json!({
            "name": "Trade show",
            "starts_at": "2026-09-10T08:00:00Z",
            "ends_at": "2026-09-12T18:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_team_membership() {
    let app = TestApp::new().await;
    let event_id = create_event(&app).await;

    let team = app
        .post("/api/teams", &app.acme_manager)
        .json(&json!({"name": "Setup crew", "event_id": event_id}))
        .await;
    team.assert_status(StatusCode::CREATED);
    let team = team.json::<Value>();
    assert_eq!(team["event_id"], event_id);
    assert!(team["member_ids"].as_array().unwrap().is_empty());
    let members_path = format!("/api/teams/{}/members", team["id"].as_str().unwrap());
    let staff_id = app.acme_staff.user.id.to_string();

    let added = app
        .post(&members_path, &app.acme_manager)
        .json(&json!({"user_id": staff_id}))
        .await;
    added.assert_status_ok();
    assert_eq!(added.json::<Value>()["member_ids"], json!([staff_id]));

    // Adding the same member again changes nothing.
    let again = app
        .post(&members_path, &app.acme_manager)
        .json(&json!({"user_id": staff_id}))
        .await;
    again.assert_status_ok();
    assert_eq!(again.json::<Value>()["member_ids"].as_array().unwrap().len(), 1);

    let removed = app
        .delete(&format!("{members_path}/{staff_id}"), &app.acme_manager)
        .await;
    removed.assert_status_ok();
    assert!(removed.json::<Value>()["member_ids"].as_array().unwrap().is_empty());

    let missing = app
        .delete(&format!("{members_path}/{staff_id}"), &app.acme_manager)
        .await;
    assert_problem(&missing, 404);
}

#[tokio::test]
async fn test_team_rejects_foreign_member() {
    let app = TestApp::new().await;

    let team_id = app
        .post("/api/teams", &app.acme_manager)
        .json(&json!({"name": "Security"}))
        .await
        .json::<Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .post(&format!("/api/teams/{team_id}/members"), &app.acme_manager)
        .json(&json!({"user_id": app.globex_admin.user.id}))
        .await;

    assert_problem(&response, 400);
}

#[tokio::test]
async fn test_list_teams_by_event() {
    let app = TestApp::new().await;
    let event_id = create_event(&app).await;
    app.post("/api/teams", &app.acme_manager)
        .json(&json!({"name": "Setup crew", "event_id": event_id}))
        .await
        .assert_status(StatusCode::CREATED);
    app.post("/api/teams", &app.acme_manager)
        .json(&json!({"name": "Office"}))
        .await
        .assert_status(StatusCode::CREATED);

    let all = app.get("/api/teams", &app.acme_staff).await;
    assert_eq!(all.header("x-total-count"), "2");

    let for_event = app
        .get("/api/teams", &app.acme_staff)
        .add_query_param("event_id", &event_id)
        .await;
    let body = for_event.json::<Value>();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["name"], "Setup crew");
}

#[tokio::test]
async fn test_create_document_defaults_issue_date() {
    let app = TestApp::new().await;
    let event_id = create_event(&app).await;

    let response = app
        .post("/api/documents", &app.acme_manager)
        .json(&json!({
            "kind": "invoice",
            "number": "INV-2026-001",
            "title": "Booth rental",
            "event_id": event_id
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "invoice");
    assert_eq!(body["event_id"], event_id);
    assert!(body["issued_at"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_document_number_conflicts() {
    let app = TestApp::new().await;
    let body = json!({"kind": "receipt", "number": "R-1", "title": "Receipt"});

    app.post("/api/documents", &app.acme_manager)
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
    let duplicate = app.post("/api/documents", &app.acme_manager).json(&body).await;

    assert_problem(&duplicate, 409);
}

#[tokio::test]
async fn test_document_unknown_kind_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/documents", &app.acme_manager)
        .json(&json!({"kind": "memo", "number": "M-1", "title": "Memo"}))
        .await;

    assert_problem(&response, 400);
}

#[tokio::test]
async fn test_document_invalid_url() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/documents", &app.acme_manager)
        .json(&json!({
            "kind": "contract",
            "number": "C-1",
            "title": "Venue contract",
            "content_url": "not a url"
        }))
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["content_url"].is_array());
}

#[tokio::test]
async fn test_document_filters_and_clearing_fields() {
    let app = TestApp::new().await;
    let event_id = create_event(&app).await;

    let doc = app
        .post("/api/documents", &app.acme_manager)
        .json(&json!({
            "kind": "delivery_note",
            "number": "DN-1",
            "title": "Chairs",
            "event_id": event_id,
            "content_url": "https://files.example.com/dn-1.pdf"
        }))
        .await
        .json::<Value>();
    app.post("/api/documents", &app.acme_manager)
        .json(&json!({"kind": "invoice", "number": "INV-1", "title": "Invoice"}))
        .await
        .assert_status(StatusCode::CREATED);

    let notes = app
        .get("/api/documents", &app.acme_staff)
        .add_query_param("kind", "delivery_note")
        .await;
    assert_eq!(notes.json::<Value>()["total_count"], 1);

    let cleared = app
        .patch(
            &format!("/api/documents/{}", doc["id"].as_str().unwrap()),
            &app.acme_manager,
        )
        .json(&json!({"event_id": null, "content_url": null}))
        .await;
    cleared.assert_status_ok();
    let cleared = cleared.json::<Value>();
    assert!(cleared["event_id"].is_null());
    assert!(cleared["content_url"].is_null());
    assert_eq!(cleared["title"], "Chairs");

    let by_event = app
        .get("/api/documents", &app.acme_staff)
        .add_query_param("event_id", &event_id)
        .await;
    assert_eq!(by_event.json::<Value>()["total_count"], 0);
}

#[tokio::test]
async fn test_document_of_other_tenant_is_forbidden() {
    let app = TestApp::new().await;

    let doc = app
        .post("/api/documents", &app.globex_admin)
        .json(&json!({"kind": "other", "number": "X-1", "title": "Secret"}))
        .await
        .json::<Value>();

    let response = app
        .get(
            &format!("/api/documents/{}", doc["id"].as_str().unwrap()),
            &app.acme_admin,
        )
        .await;

    assert_problem(&response, 403);
}
