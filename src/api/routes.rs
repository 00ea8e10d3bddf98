//! API route configuration.
//!
//! Everything in [`protected_routes`] requires Bearer token authentication via
//! [`crate::api::middleware::auth`]; [`public_routes`] does not.

use crate::api::handlers::*;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated API routes.
///
/// # Endpoints
///
/// - `/tenants`, `/tenants/current`, `/tenants/{id}`
/// - `/users`, `/users/me`, `/users/{id}`
/// - `/addresses`, `/events`, `/products`, `/documents`: list/create, get/patch/delete by id
/// - `/teams` plus `/teams/{id}/members[/{user_id}]`
/// - `/warehouses` plus `/warehouses/{id}/stock` and `/warehouses/{id}/stock/adjustments`
/// - `/price-lists` plus `/price-lists/{id}/items[/{product_id}]`
/// - `/branding`
/// - `/logs`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants",
            get(list_tenants_handler).post(create_tenant_handler),
        )
        .route("/tenants/current", get(current_tenant_handler))
        .route(
            "/tenants/{id}",
            get(get_tenant_handler)
                .patch(update_tenant_handler)
                .delete(delete_tenant_handler),
        )
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/me", get(me_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(
            "/addresses",
            get(list_addresses_handler).post(create_address_handler),
        )
        .route(
            "/addresses/{id}",
            get(get_address_handler)
                .patch(update_address_handler)
                .delete(delete_address_handler),
        )
        .route(
            "/events",
            get(list_events_handler).post(create_event_handler),
        )
        .route(
            "/events/{id}",
            get(get_event_handler)
                .patch(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/teams", get(list_teams_handler).post(create_team_handler))
        .route(
            "/teams/{id}",
            get(get_team_handler)
                .patch(update_team_handler)
                .delete(delete_team_handler),
        )
        .route("/teams/{id}/members", post(add_team_member_handler))
        .route(
            "/teams/{id}/members/{user_id}",
            delete(remove_team_member_handler),
        )
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(get_product_handler)
                .patch(update_product_handler)
                .delete(delete_product_handler),
        )
        .route(
            "/warehouses",
            get(list_warehouses_handler).post(create_warehouse_handler),
        )
        .route(
            "/warehouses/{id}",
            get(get_warehouse_handler)
                .patch(update_warehouse_handler)
                .delete(delete_warehouse_handler),
        )
        .route("/warehouses/{id}/stock", get(list_stock_handler))
        .route(
            "/warehouses/{id}/stock/adjustments",
            post(adjust_stock_handler),
        )
        .route(
            "/documents",
            get(list_documents_handler).post(create_document_handler),
        )
        .route(
            "/documents/{id}",
            get(get_document_handler)
                .patch(update_document_handler)
                .delete(delete_document_handler),
        )
        .route(
            "/price-lists",
            get(list_price_lists_handler).post(create_price_list_handler),
        )
        .route(
            "/price-lists/{id}",
            get(get_price_list_handler)
                .patch(update_price_list_handler)
                .delete(delete_price_list_handler),
        )
        .route(
            "/price-lists/{id}/items",
            get(list_price_list_items_handler),
        )
        .route(
            "/price-lists/{id}/items/{product_id}",
            put(set_price_list_item_handler).delete(remove_price_list_item_handler),
        )
        .route(
            "/branding",
            get(get_branding_handler).put(update_branding_handler),
        )
        .route("/logs", get(list_logs_handler).post(submit_logs_handler))
}

/// Unauthenticated API routes.
///
/// - `GET /branding/public/{slug}` - branding for login pages
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/branding/public/{slug}", get(public_branding_handler))
}
