//! Handlers for address endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::address::{
    AddressResponse, AddressSearchParams, CreateAddressRequest, UpdateAddressRequest,
};
use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/addresses?search=berlin`
///
/// `search` matches label or city, case-insensitively.
pub async fn list_addresses_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<AddressSearchParams>,
) -> Result<Paged<AddressResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .address_service
        .list_addresses(&ctx, params.search, pagination.request)
        .await?;
    Ok(Paged::new(page.map(AddressResponse::from), pagination))
}

pub async fn create_address_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), AppError> {
    payload.validate()?;

    let address = state
        .address_service
        .create_address(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

pub async fn get_address_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AddressResponse>, AppError> {
    let address = state.address_service.get_address(&ctx, id).await?;
    Ok(Json(address.into()))
}

pub async fn update_address_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateAddressRequest>,
) -> Result<Json<AddressResponse>, AppError> {
    payload.validate()?;
    payload.validate_nullable()?;

    let address = state
        .address_service
        .update_address(&ctx, id, payload.into())
        .await?;
    Ok(Json(address.into()))
}

/// `DELETE /api/addresses/{id}`
///
/// Events and warehouses located at the address keep existing without one.
pub async fn delete_address_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.address_service.delete_address(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
