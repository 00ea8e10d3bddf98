//! Request extractors rejecting with [`AppError`] problem responses.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use serde_json::json;

use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;

/// JSON body; malformed bodies become validation problems.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed parameters become validation problems.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters; e.g. a non-UUID id becomes a validation problem.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// The tenant context attached by [`crate::api::middleware::auth::layer`].
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Request is not authenticated"}),
                )
            })
    }
}
