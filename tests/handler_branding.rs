mod common;

use common::{TestApp, as_tenant, assert_problem};
use eventdesk::domain::entities::TenantPatch;
use serde_json::{Value, json};

fn branding(app_name: &str) -> Value {
    json!({
        "app_name": app_name,
        "primary_color": "#112233",
        "secondary_color": "#abcdef",
        "logo_url": "https://cdn.example.com/logo.png"
    })
}

#[tokio::test]
async fn test_default_branding() {
    let app = TestApp::new().await;

    let response = app.get("/api/branding", &app.acme_staff).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["tenant_id"], app.acme.id.to_string());
    assert_eq!(body["app_name"], "Acme Events");
    assert_eq!(body["primary_color"], "#1F2937");
    assert_eq!(body["secondary_color"], "#F59E0B");
    assert!(body["logo_url"].is_null());
}

#[tokio::test]
async fn test_tenant_admin_updates_branding() {
    let app = TestApp::new().await;

    let updated = app
        .put("/api/branding", &app.acme_admin)
        .json(&branding("Acme Live"))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["app_name"], "Acme Live");

    let fetched = app.get("/api/branding", &app.acme_staff).await.json::<Value>();
    assert_eq!(fetched["primary_color"], "#112233");
    assert_eq!(fetched["logo_url"], "https://cdn.example.com/logo.png");

    // Other tenants keep their defaults.
    let globex = app.get("/api/branding", &app.globex_admin).await.json::<Value>();
    assert_eq!(globex["app_name"], "Globex");
}

#[tokio::test]
async fn test_staff_cannot_update_branding() {
    let app = TestApp::new().await;

    let response = app
        .put("/api/branding", &app.acme_staff)
        .json(&branding("Nope"))
        .await;

    assert_problem(&response, 403);
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .put("/api/branding", &app.acme_admin)
        .json(&json!({
            "app_name": "Acme",
            "primary_color": "red",
            "secondary_color": "#F59E0B"
        }))
        .await;

    let body = assert_problem(&response, 400);
    assert_eq!(body["errors"]["primary_color"][0], "Color must be #RRGGBB");
}

#[tokio::test]
async fn test_super_admin_brands_impersonated_tenant() {
    let app = TestApp::new().await;

    as_tenant(app.put("/api/branding", &app.super_admin), app.globex.id)
        .json(&branding("Globex Expo"))
        .await
        .assert_status_ok();

    let public = app.server.get("/api/branding/public/globex").await;
    public.assert_status_ok();
    assert_eq!(public.json::<Value>()["app_name"], "Globex Expo");
}

#[tokio::test]
async fn test_public_branding_needs_no_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/branding/public/acme").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["app_name"], "Acme Events");
    assert_eq!(body["tenant_id"], app.acme.id.to_string());
}

#[tokio::test]
async fn test_public_branding_unknown_slug() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/branding/public/nobody").await;

    assert_problem(&response, 404);
}

#[tokio::test]
async fn test_public_branding_hides_inactive_tenant() {
    let app = TestApp::new().await;
    app.repos
        .tenants
        .update(
            app.globex.id,
            TenantPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let response = app.server.get("/api/branding/public/globex").await;

    assert_problem(&response, 404);
}
