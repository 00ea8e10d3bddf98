//! Handlers for sales documents (quotes, invoices, contracts, receipts).

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::document::{
    CreateDocumentRequest, DocumentFilterParams, DocumentResponse, UpdateDocumentRequest,
};
use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists documents, newest `issued_at` first.
///
/// # Endpoint
///
/// `GET /api/documents?kind=invoice&event_id=...`
pub async fn list_documents_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<DocumentFilterParams>,
) -> Result<Paged<DocumentResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .document_service
        .list_documents(&ctx, params.kind, params.event_id, pagination.request)
        .await?;
    Ok(Paged::new(page.map(DocumentResponse::from), pagination))
}

/// Creates a document.
///
/// # Endpoint
///
/// `POST /api/documents`
///
/// ```json
/// {
///   "kind": "invoice",
///   "number": "INV-2025-0001",
///   "title": "Catering",
///   "event_id": "...",            // optional
///   "content_url": "https://...", // optional
///   "issued_at": "2025-07-02T09:00:00Z" // optional, defaults to now
/// }
/// ```
///
/// # Errors
///
/// - 409 if the number is already used in the tenant
pub async fn create_document_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    payload.validate()?;

    let document = state
        .document_service
        .create_document(&ctx, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

pub async fn get_document_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state.document_service.get_document(&ctx, id).await?;
    Ok(Json(document.into()))
}

/// `PATCH /api/documents/{id}`
///
/// `event_id` and `content_url` accept `null` to clear them.
pub async fn update_document_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    payload.validate()?;
    payload.validate_nullable()?;

    let document = state
        .document_service
        .update_document(&ctx, id, payload.into())
        .await?;
    Ok(Json(document.into()))
}

pub async fn delete_document_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.document_service.delete_document(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
