//! Handlers for tenant management endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::tenant::{
    CreateTenantRequest, TenantResponse, TenantSearchParams, UpdateTenantRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists tenants.
///
/// # Endpoint
///
/// `GET /api/tenants?search=acme&page=1&page_size=25`
///
/// Super admins only. `search` matches name or slug, case-insensitively.
/// Soft-deleted tenants are not listed.
pub async fn list_tenants_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<TenantSearchParams>,
) -> Result<Paged<TenantResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .tenant_service
        .list_tenants(&ctx, params.search, pagination.request)
        .await?;
    Ok(Paged::new(page.map(TenantResponse::from), pagination))
}

/// Creates a tenant.
///
/// # Endpoint
///
/// `POST /api/tenants`
///
/// ```json
/// { "name": "Acme Events", "slug": "acme" }
/// ```
///
/// # Errors
///
/// - 400 if the name or slug is invalid
/// - 403 unless the caller is a super admin
/// - 409 if the slug is taken
pub async fn create_tenant_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), AppError> {
    payload.validate()?;

    let tenant = state
        .tenant_service
        .create_tenant(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// Returns the tenant the request operates on.
///
/// # Endpoint
///
/// `GET /api/tenants/current`
pub async fn current_tenant_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<TenantResponse>, AppError> {
    let tenant = state.tenant_service.current_tenant(&ctx).await?;
    Ok(Json(tenant.into()))
}

/// `GET /api/tenants/{id}`: super admins, or members of that tenant.
pub async fn get_tenant_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TenantResponse>, AppError> {
    let tenant = state.tenant_service.get_tenant(&ctx, id).await?;
    Ok(Json(tenant.into()))
}

/// Renames or (de)activates a tenant.
///
/// # Endpoint
///
/// `PATCH /api/tenants/{id}` (super admins only)
pub async fn update_tenant_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, AppError> {
    payload.validate()?;

    let tenant = state
        .tenant_service
        .update_tenant(&ctx, id, payload.into())
        .await?;
    Ok(Json(tenant.into()))
}

/// Soft-deletes a tenant.
///
/// # Endpoint
///
/// `DELETE /api/tenants/{id}` (super admins only)
///
/// Users of a deleted tenant can no longer authenticate and its public
/// branding stops resolving.
pub async fn delete_tenant_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.tenant_service.delete_tenant(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
