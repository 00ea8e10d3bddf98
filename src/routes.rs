//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                    - Health check: storage, cache, log queue (public)
//! - `GET  /api/branding/public/{slug}` - Public branding (rate limited)
//! - `/api/*`                           - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Request context** - Correlation id and problem `instance`
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token resolving the tenant context
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, PeerIpKeyExtractor, SmartIpKeyExtractor};
use crate::api::middleware::{auth, request_context, tracing};
use crate::error::AppError;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use serde_json::json;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// The server must be started with `into_make_service_with_connect_info`
/// so the rate limiter can see peer addresses.
///
/// # Errors
///
/// Returns an error if a rate limit tier is misconfigured.
pub fn app_router(state: AppState, behind_proxy: bool) -> anyhow::Result<NormalizePath<Router>> {
    let protected = protected_api(&state);
    let public = api::routes::public_routes();

    let (protected, public) = if behind_proxy {
        (
            protected.layer(rate_limit::layer(SmartIpKeyExtractor, rate_limit::API)?),
            public.layer(rate_limit::layer(SmartIpKeyExtractor, rate_limit::PUBLIC)?),
        )
    } else {
        (
            protected.layer(rate_limit::layer(PeerIpKeyExtractor, rate_limit::API)?),
            public.layer(rate_limit::layer(PeerIpKeyExtractor, rate_limit::PUBLIC)?),
        )
    };

    let router = assemble(state, protected.merge(public));
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

/// Same routes as [`app_router`] without rate limiting or path normalization.
///
/// For in-process tests, where requests carry no peer address.
pub fn unthrottled_router(state: AppState) -> Router {
    let api_router = protected_api(&state).merge(api::routes::public_routes());
    assemble(state, api_router)
}

fn protected_api(state: &AppState) -> Router<AppState> {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
}

fn assemble(state: AppState, api_router: Router<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_context::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found", json!({}))
}
