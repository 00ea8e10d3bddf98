//! Repository trait for teams and their membership.

use crate::domain::entities::{NewTeam, Team, TeamPatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TeamFilter {
    pub tenant_id: Uuid,
    pub event_id: Option<Uuid>,
}

impl TeamFilter {
    pub fn matches(&self, t: &Team) -> bool {
        t.tenant_id == self.tenant_id && self.event_id.is_none_or(|e| t.event_id == Some(e))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, new_team: NewTeam) -> Result<Team, AppError>;

    /// Loads a team with its members.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, AppError>;

    /// Lists teams ordered by name.
    async fn list(&self, filter: TeamFilter, page: PageRequest) -> Result<Page<Team>, AppError>;

    async fn update(&self, id: Uuid, patch: TeamPatch) -> Result<Team, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Adds a member. Adding an existing member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the team does not exist.
    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError>;

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the team does not exist or the user
    /// is not a member.
    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Team, AppError>;
}
