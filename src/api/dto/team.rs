//! DTOs for teams and team membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::team_service::CreateTeam;
use crate::domain::entities::{Team, TeamPatch};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub event_id: Option<Uuid>,
}

impl From<CreateTeamRequest> for CreateTeam {
    fn from(req: CreateTeamRequest) -> Self {
        CreateTeam {
            name: req.name,
            event_id: req.event_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    /// Absent = no change, null = detach from the event.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub event_id: Option<Option<Uuid>>,
}

impl From<UpdateTeamRequest> for TeamPatch {
    fn from(req: UpdateTeamRequest) -> Self {
        TeamPatch {
            name: req.name,
            event_id: req.event_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamFilterParams {
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            tenant_id: t.tenant_id,
            event_id: t.event_id,
            name: t.name,
            member_ids: t.member_ids,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
