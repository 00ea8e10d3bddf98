//! Handlers for tenant branding.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::branding::{BrandingResponse, UpdateBrandingRequest};
use crate::api::extract::{ApiJson, ApiPath};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/branding`
///
/// Returns defaults derived from the tenant name when nothing is stored.
pub async fn get_branding_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<BrandingResponse>, AppError> {
    let branding = state.branding_service.get_branding(&ctx).await?;
    Ok(Json(branding.into()))
}

/// Replaces the branding of the active tenant.
///
/// # Endpoint
///
/// `PUT /api/branding`
///
/// ```json
/// {
///   "app_name": "Acme Events",
///   "primary_color": "#1a73e8",
///   "secondary_color": "#ffffff",
///   "logo_url": "https://cdn.example.com/logo.svg"
/// }
/// ```
///
/// Invalidates the cached public branding of the tenant.
pub async fn update_branding_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<UpdateBrandingRequest>,
) -> Result<Json<BrandingResponse>, AppError> {
    payload.validate()?;

    let branding = state
        .branding_service
        .update_branding(&ctx, payload.into())
        .await?;
    Ok(Json(branding.into()))
}

/// Unauthenticated branding lookup for login pages.
///
/// # Endpoint
///
/// `GET /api/branding/public/{slug}`
///
/// Served from the cache when possible; 404 for unknown, inactive or
/// deleted tenants.
pub async fn public_branding_handler(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<BrandingResponse>, AppError> {
    let branding = state.branding_service.public_branding(&slug).await?;
    Ok(Json(branding.into()))
}
