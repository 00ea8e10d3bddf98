//! Handlers for event endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::event::{
    CreateEventRequest, EventFilterParams, EventResponse, UpdateEventRequest,
};
use crate::api::dto::pagination::{DateFilterParams, Paged, PaginationParams};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::application::services::event_service::EventQuery;
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists events of the active tenant.
///
/// # Endpoint
///
/// `GET /api/events?status=scheduled&from=2025-06-01T00:00:00Z&to=2025-06-30T23:59:59Z&search=gala`
///
/// # Query Parameters
///
/// - `status` - one of `draft`, `scheduled`, `cancelled`, `completed`
/// - `from` / `to` - RFC 3339; returns events overlapping the range
/// - `search` - case-insensitive match on the name
/// - `page`, `page_size` - pagination
///
/// Events are ordered by start time.
pub async fn list_events_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(dates): ApiQuery<DateFilterParams>,
    ApiQuery(params): ApiQuery<EventFilterParams>,
) -> Result<Paged<EventResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let query = EventQuery {
        status: params.status,
        from: dates.from,
        to: dates.to,
        search: params.search,
    };

    let page = state
        .event_service
        .list_events(&ctx, query, pagination.request)
        .await?;
    Ok(Paged::new(page.map(EventResponse::from), pagination))
}

/// Creates an event.
///
/// # Endpoint
///
/// `POST /api/events`
///
/// ```json
/// {
///   "name": "Summer Gala",
///   "starts_at": "2025-07-01T18:00:00Z",
///   "ends_at": "2025-07-01T23:00:00Z",
///   "venue_address_id": "5b0c...",   // optional
///   "status": "scheduled"            // optional, draft by default
/// }
/// ```
///
/// # Errors
///
/// - 400 if `ends_at` precedes `starts_at`, the venue is not an address of
///   the tenant, or the status is terminal
pub async fn create_event_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    payload.validate()?;

    let event = state.event_service.create_event(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.event_service.get_event(&ctx, id).await?;
    Ok(Json(event.into()))
}

/// Partially updates an event.
///
/// # Endpoint
///
/// `PATCH /api/events/{id}`
///
/// # Status Transitions
///
/// - `draft` → `scheduled` | `cancelled`
/// - `scheduled` → `completed` | `cancelled` | `draft`
///
/// Cancelled and completed events cannot be changed (409).
pub async fn update_event_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    payload.validate_nullable()?;

    let event = state
        .event_service
        .update_event(&ctx, id, payload.into())
        .await?;
    Ok(Json(event.into()))
}

/// `DELETE /api/events/{id}`
///
/// Teams and documents of the event are kept and detached from it.
pub async fn delete_event_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.event_service.delete_event(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
