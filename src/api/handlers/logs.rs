//! Handlers for client log ingestion and queries.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::client_log::{
    ClientLogResponse, LogFilterParams, SubmitLogsRequest, SubmitLogsResponse,
};
use crate::api::dto::pagination::{DateFilterParams, Paged, PaginationParams};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Queues client log entries for persistence.
///
/// # Endpoint
///
/// `POST /api/logs`
///
/// ```json
/// {
///   "entries": [
///     { "level": "error", "message": "Checkout failed", "source": "web",
///       "properties": { "order": 42 } }
///   ]
/// }
/// ```
///
/// # Response
///
/// 202 with `{"accepted": n}`. Entries are written by a background worker,
/// so they may not be listed immediately.
///
/// # Errors
///
/// - 400 for an empty batch or more than 100 entries
/// - 503 when the queue is full
pub async fn submit_logs_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<SubmitLogsRequest>,
) -> Result<(StatusCode, Json<SubmitLogsResponse>), AppError> {
    payload.validate()?;

    let accepted = state
        .client_log_service
        .submit(&ctx, payload.entries.into_iter().map(Into::into).collect())?;
    Ok((StatusCode::ACCEPTED, Json(SubmitLogsResponse { accepted })))
}

/// `GET /api/logs?level=warning&from=...&to=...`
///
/// `level` is a minimum severity. Newest entries first.
pub async fn list_logs_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(dates): ApiQuery<DateFilterParams>,
    ApiQuery(params): ApiQuery<LogFilterParams>,
) -> Result<Paged<ClientLogResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .client_log_service
        .list_logs(&ctx, params.level, dates.from, dates.to, pagination.request)
        .await?;
    Ok(Paged::new(page.map(ClientLogResponse::from), pagination))
}
