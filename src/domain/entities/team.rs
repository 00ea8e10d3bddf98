//! Team entity: a named group of users, optionally staffing an event.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Team {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    /// Member user ids, in insertion order, without duplicates.
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.member_ids.contains(&user_id)
    }

    pub fn apply(&mut self, patch: TeamPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.event_id {
            self.event_id = v;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub tenant_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub event_id: Option<Option<Uuid>>,
}
