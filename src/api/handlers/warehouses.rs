//! Handlers for warehouses and stock levels.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::warehouse::{
    CreateWarehouseRequest, StockAdjustmentRequest, StockLevelResponse, UpdateWarehouseRequest,
    WarehouseFilterParams, WarehouseResponse,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::entities::StockAdjustment;
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/warehouses?is_active=true`
pub async fn list_warehouses_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<WarehouseFilterParams>,
) -> Result<Paged<WarehouseResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .warehouse_service
        .list_warehouses(&ctx, params.is_active, pagination.request)
        .await?;
    Ok(Paged::new(page.map(WarehouseResponse::from), pagination))
}

pub async fn create_warehouse_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<WarehouseResponse>), AppError> {
    payload.validate()?;

    let warehouse = state
        .warehouse_service
        .create_warehouse(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(warehouse.into())))
}

pub async fn get_warehouse_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WarehouseResponse>, AppError> {
    let warehouse = state.warehouse_service.get_warehouse(&ctx, id).await?;
    Ok(Json(warehouse.into()))
}

pub async fn update_warehouse_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateWarehouseRequest>,
) -> Result<Json<WarehouseResponse>, AppError> {
    payload.validate()?;

    let warehouse = state
        .warehouse_service
        .update_warehouse(&ctx, id, payload.into())
        .await?;
    Ok(Json(warehouse.into()))
}

/// `DELETE /api/warehouses/{id}`; stock levels are removed with it.
pub async fn delete_warehouse_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.warehouse_service.delete_warehouse(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists stock levels of a warehouse.
///
/// # Endpoint
///
/// `GET /api/warehouses/{id}/stock`
///
/// Products that were never stocked in the warehouse are not listed.
pub async fn list_stock_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> Result<Paged<StockLevelResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .warehouse_service
        .list_stock(&ctx, id, pagination.request)
        .await?;
    Ok(Paged::new(page.map(StockLevelResponse::from), pagination))
}

/// Applies a signed quantity change.
///
/// # Endpoint
///
/// `POST /api/warehouses/{id}/stock/adjustments`
///
/// ```json
/// { "product_id": "...", "delta": -5, "reason": "damaged" }
/// ```
///
/// # Response
///
/// The resulting stock level.
///
/// # Errors
///
/// - 400 for a zero delta or a product outside the tenant
/// - 409 if the warehouse is inactive or the quantity would go negative
pub async fn adjust_stock_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StockAdjustmentRequest>,
) -> Result<Json<StockLevelResponse>, AppError> {
    payload.validate()?;
    if payload.delta == 0 {
        return Err(AppError::validation("delta", "delta must not be zero"));
    }

    let level = state
        .warehouse_service
        .adjust_stock(
            &ctx,
            StockAdjustment {
                warehouse_id: id,
                product_id: payload.product_id,
                delta: payload.delta,
                reason: payload.reason,
            },
        )
        .await?;
    Ok(Json(level.into()))
}
