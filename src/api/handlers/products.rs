//! Handlers for product catalog endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::product::{
    CreateProductRequest, ProductFilterParams, ProductResponse, UpdateProductRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists products ordered by SKU.
///
/// # Endpoint
///
/// `GET /api/products?search=cable&is_active=true`
///
/// `search` matches SKU or name.
pub async fn list_products_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<ProductFilterParams>,
) -> Result<Paged<ProductResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .product_service
        .list_products(&ctx, params.search, params.is_active, pagination.request)
        .await?;
    Ok(Paged::new(page.map(ProductResponse::from), pagination))
}

/// `POST /api/products`; 409 if the SKU already exists in the tenant.
pub async fn create_product_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    payload.validate()?;

    let product = state
        .product_service
        .create_product(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state.product_service.get_product(&ctx, id).await?;
    Ok(Json(product.into()))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate()?;
    payload.validate_nullable()?;

    let product = state
        .product_service
        .update_product(&ctx, id, payload.into())
        .await?;
    Ok(Json(product.into()))
}

/// Deletes a product.
///
/// # Endpoint
///
/// `DELETE /api/products/{id}`
///
/// # Errors
///
/// 409 while the product still has stock levels or price list items.
/// Deactivate it instead to hide it from active listings.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.product_service.delete_product(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
