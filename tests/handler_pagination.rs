mod common;

use common::{TestApp, assert_problem};
use eventdesk::domain::entities::NewProduct;
use serde_json::Value;

async fn seed_products(app: &TestApp, count: usize) {
    for i in 0..count {
        app.repos
            .products
            .create(NewProduct {
                tenant_id: app.acme.id,
                sku: format!("SKU-{i:04}"),
                name: format!("Product {i:04}"),
                description: None,
                unit: "pcs".to_string(),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_default_page_headers() {
    let app = TestApp::new().await;
    seed_products(&app, 30).await;

    let response = app.get("/api/products", &app.acme_staff).await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "30");
    assert_eq!(response.header("x-page"), "1");
    assert_eq!(response.header("x-page-size"), "25");
    assert_eq!(response.header("x-total-pages"), "2");
    assert_eq!(response.header("x-pagination-capped"), "false");

    let body = response.json::<Value>();
    assert_eq!(body["items"].as_array().unwrap().len(), 25);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 25);
    assert_eq!(body["total_count"], 30);
    assert_eq!(body["total_pages"], 2);
}

#[tokio::test]
async fn test_second_page_holds_remainder() {
    let app = TestApp::new().await;
    seed_products(&app, 30).await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page", 2)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-page"), "2");
    let body = response.json::<Value>();
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new().await;
    seed_products(&app, 3).await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page", 9)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "3");
    assert!(response.json::<Value>()["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_collection() {
    let app = TestApp::new().await;

    let response = app.get("/api/products", &app.acme_staff).await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "0");
    assert_eq!(response.header("x-total-pages"), "0");
}

#[tokio::test]
async fn test_page_size_capped_by_role() {
    let app = TestApp::new().await;
    seed_products(&app, 3).await;

    let staff = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page_size", 500)
        .await;
    staff.assert_status_ok();
    assert_eq!(staff.header("x-page-size"), "100");
    assert_eq!(staff.header("x-pagination-capped"), "true");

    let admin = app
        .get("/api/products", &app.acme_admin)
        .add_query_param("page_size", 500)
        .await;
    admin.assert_status_ok();
    assert_eq!(admin.header("x-page-size"), "500");
    assert_eq!(admin.header("x-pagination-capped"), "false");
}

#[tokio::test]
async fn test_camel_case_page_size_alias() {
    let app = TestApp::new().await;
    seed_products(&app, 5).await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("pageSize", 2)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-page-size"), "2");
    assert_eq!(response.header("x-total-pages"), "3");
}

#[tokio::test]
async fn test_zero_page_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page", 0)
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["page"].is_array());
}

#[tokio::test]
async fn test_zero_page_size_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page_size", 0)
        .await;

    let body = assert_problem(&response, 400);
    assert!(body["errors"]["page_size"].is_array());
}

#[tokio::test]
async fn test_non_numeric_page_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/products", &app.acme_staff)
        .add_query_param("page", "first")
        .await;

    assert_problem(&response, 400);
}
