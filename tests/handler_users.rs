mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_problem};
use eventdesk::domain::entities::Role;
use serde_json::{Value, json};

#[tokio::test]
async fn test_me_returns_caller() {
    let app = TestApp::new().await;

    let response = app.get("/api/users/me", &app.acme_manager).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["email"], "manager@acme.test");
    assert_eq!(body["role"], "manager");
    assert_eq!(body["tenant_id"], app.acme.id.to_string());
}

#[tokio::test]
async fn test_list_users_is_scoped_to_tenant() {
    let app = TestApp::new().await;

    let response = app.get("/api/users", &app.acme_admin).await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "3");
    let body = response.json::<Value>();
    assert!(
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["tenant_id"] == app.acme.id.to_string())
    );
}

#[tokio::test]
async fn test_list_users_filters_by_role() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/users", &app.acme_admin)
        .add_query_param("role", "staff")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["email"], "staff@acme.test");
}

#[tokio::test]
async fn test_tenant_admin_creates_user() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/users", &app.acme_admin)
        .json(&json!({
            "email": "New.Hire@Acme.test",
            "display_name": "New Hire",
            "role": "staff"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["email"], "new.hire@acme.test");
    assert_eq!(body["tenant_id"], app.acme.id.to_string());
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/users", &app.acme_admin)
        .json(&json!({
            "email": "staff@acme.test",
            "display_name": "Dup",
            "role": "staff"
        }))
        .await;

    assert_problem(&response, 409);
}

#[tokio::test]
async fn test_create_user_invalid_email() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/users", &app.acme_admin)
        .json(&json!({
            "email": "nope",
            "display_name": "Nope",
            "role": "staff"
        }))
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_cannot_grant_super_admin() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/users", &app.acme_admin)
        .json(&json!({
            "email": "boss@acme.test",
            "display_name": "Boss",
            "role": "super_admin"
        }))
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_manager_cannot_create_users() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/users", &app.acme_manager)
        .json(&json!({
            "email": "someone@acme.test",
            "display_name": "Someone",
            "role": "staff"
        }))
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_get_user_of_other_tenant_is_forbidden() {
    let app = TestApp::new().await;

    let response = app
        .get(&format!("/api/users/{}", app.globex_admin.user.id), &app.acme_admin)
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_staff_updates_own_display_name() {
    let app = TestApp::new().await;

    let response = app
        .patch(&format!("/api/users/{}", app.acme_staff.user.id), &app.acme_staff)
        .json(&json!({"display_name": "Renamed"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["display_name"], "Renamed");
}

#[tokio::test]
async fn test_staff_cannot_promote_self() {
    let app = TestApp::new().await;

    let response = app
        .patch(&format!("/api/users/{}", app.acme_staff.user.id), &app.acme_staff)
        .json(&json!({"role": "tenant_admin"}))
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_cannot_delete_self() {
    let app = TestApp::new().await;

    let response = app
        .delete(&format!("/api/users/{}", app.acme_admin.user.id), &app.acme_admin)
        .await;

    assert_problem(&response, 400);
}

#[tokio::test]
async fn test_delete_user_deactivates_and_revokes_tokens() {
    let app = TestApp::new().await;
    let extra = app
        .actor(Some(app.acme.id), "temp@acme.test", Role::Staff)
        .await;

    app.get("/api/users/me", &extra).await.assert_status_ok();

    app.delete(&format!("/api/users/{}", extra.user.id), &app.acme_admin)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let fetched = app
        .get(&format!("/api/users/{}", extra.user.id), &app.acme_admin)
        .await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["is_active"], false);

    let locked_out = app.get("/api/users/me", &extra).await;
    assert_problem(&locked_out, 401);
}
