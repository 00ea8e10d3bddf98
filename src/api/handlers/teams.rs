//! Handlers for team and team membership endpoints.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paged, PaginationParams};
use crate::api::dto::team::{
    AddMemberRequest, CreateTeamRequest, TeamFilterParams, TeamResponse, UpdateTeamRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/teams?event_id=...`
pub async fn list_teams_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<TeamFilterParams>,
) -> Result<Paged<TeamResponse>, AppError> {
    let pagination = paging.resolve(ctx.role)?;
    let page = state
        .team_service
        .list_teams(&ctx, params.event_id, pagination.request)
        .await?;
    Ok(Paged::new(page.map(TeamResponse::from), pagination))
}

pub async fn create_team_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(payload): ApiJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    payload.validate()?;

    let team = state.team_service.create_team(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(team.into())))
}

pub async fn get_team_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TeamResponse>, AppError> {
    let team = state.team_service.get_team(&ctx, id).await?;
    Ok(Json(team.into()))
}

pub async fn update_team_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    payload.validate()?;

    let team = state
        .team_service
        .update_team(&ctx, id, payload.into())
        .await?;
    Ok(Json(team.into()))
}

pub async fn delete_team_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.team_service.delete_team(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a user to a team.
///
/// # Endpoint
///
/// `POST /api/teams/{id}/members`
///
/// ```json
/// { "user_id": "..." }
/// ```
///
/// The user must be an active user of the team's tenant (400 otherwise).
/// Adding an existing member returns the team unchanged.
pub async fn add_team_member_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AddMemberRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    let team = state
        .team_service
        .add_member(&ctx, id, payload.user_id)
        .await?;
    Ok(Json(team.into()))
}

/// Removes a user from a team.
///
/// # Endpoint
///
/// `DELETE /api/teams/{id}/members/{user_id}`
///
/// Returns the updated team; 404 if the user is not a member.
pub async fn remove_team_member_handler(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath((id, user_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<TeamResponse>, AppError> {
    let team = state.team_service.remove_member(&ctx, id, user_id).await?;
    Ok(Json(team.into()))
}
