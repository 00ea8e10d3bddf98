//! Handlers for user management endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::user::{
    CreateUserRequest, UpdateUserRequest, UserResponse, UserSearchParams,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists users of the active tenant.
///
/// # Endpoint
///
/// `GET /api/users?search=ann&role=manager`
///
/// Requires Manager or above.
pub async fn list_users_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<UserSearchParams>,
) -> Result<Paged<UserResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .user_service
        .list_users(&ctx, params.search, params.role, pagination.request)
        .await?;
    Ok(Paged::new(page.map(UserResponse::from), pagination))
}

/// Creates a user in the active tenant.
///
/// # Endpoint
///
/// `POST /api/users`
///
/// ```json
/// { "email": "ann@example.com", "display_name": "Ann", "role": "staff" }
/// ```
///
/// # Errors
///
/// - 403 below TenantAdmin, or when granting a role above the caller's own
/// - 409 if the email is already registered
pub async fn create_user_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state.user_service.create_user(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /api/users/me`
pub async fn me_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.me(&ctx).await?;
    Ok(Json(user.into()))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user(&ctx, id).await?;
    Ok(Json(user.into()))
}

/// Partially updates a user.
///
/// # Endpoint
///
/// `PATCH /api/users/{id}`
///
/// Anyone may change their own `display_name`. Role, active flag and other
/// users need TenantAdmin. Deactivating a user revokes their tokens.
pub async fn update_user_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .update_user(&ctx, id, payload.into())
        .await?;
    Ok(Json(user.into()))
}

/// Deactivates a user and revokes all of their tokens.
///
/// # Endpoint
///
/// `DELETE /api/users/{id}` (TenantAdmin and above; not oneself)
pub async fn delete_user_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.user_service.deactivate_user(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
