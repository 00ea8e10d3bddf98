//! Handlers for price lists and their per-product prices.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::price_list::{
    CreatePriceListRequest, PriceListFilterParams, PriceListItemResponse, PriceListResponse,
    SetItemPriceRequest, UpdatePriceListRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/price-lists?currency=EUR`
pub async fn list_price_lists_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<PriceListFilterParams>,
) -> Result<Paged<PriceListResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .price_list_service
        .list_price_lists(&ctx, params.currency, pagination.request)
        .await?;
    Ok(Paged::new(page.map(PriceListResponse::from), pagination))
}

pub async fn create_price_list_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreatePriceListRequest>,
) -> Result<(StatusCode, Json<PriceListResponse>), AppError> {
    payload.validate()?;

    let list = state
        .price_list_service
        .create_price_list(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(list.into())))
}

pub async fn get_price_list_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PriceListResponse>, AppError> {
    let list = state.price_list_service.get_price_list(&ctx, id).await?;
    Ok(Json(list.into()))
}

pub async fn update_price_list_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePriceListRequest>,
) -> Result<Json<PriceListResponse>, AppError> {
    payload.validate()?;

    let list = state
        .price_list_service
        .update_price_list(&ctx, id, payload.into())
        .await?;
    Ok(Json(list.into()))
}

pub async fn delete_price_list_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.price_list_service.delete_price_list(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/price-lists/{id}/items`
pub async fn list_price_list_items_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<PriceListItemResponse>>, AppError> {
    let items = state.price_list_service.list_items(&ctx, id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Sets or replaces the price of one product.
///
/// # Endpoint
///
/// `PUT /api/price-lists/{id}/items/{product_id}`
///
/// ```json
/// { "unit_price": "12.50" }
/// ```
///
/// # Errors
///
/// - 400 for a negative price or a product outside the tenant
pub async fn set_price_list_item_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath((id, product_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<SetItemPriceRequest>,
) -> Result<Json<PriceListItemResponse>, AppError> {
    let item = state
        .price_list_service
        .set_item_price(&ctx, id, product_id, payload.unit_price)
        .await?;
    Ok(Json(item.into()))
}

pub async fn remove_price_list_item_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath((id, product_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .price_list_service
        .remove_item(&ctx, id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
