//! Event entity and its status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

/// Lifecycle status of an event.
///
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Scheduled,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Scheduled => "scheduled",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Cancelled | EventStatus::Completed)
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        use EventStatus::*;
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Draft, Scheduled)
                | (Draft, Cancelled)
                | (Scheduled, Draft)
                | (Scheduled, Completed)
                | (Scheduled, Cancelled)
        )
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "scheduled" => Ok(EventStatus::Scheduled),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            other => Err(UnknownVariant::new("event status", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub venue_address_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub venue_address_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub venue_address_id: Option<Option<Uuid>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
}

impl Event {
    pub fn apply(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.venue_address_id {
            self.venue_address_id = v;
        }
        if let Some(v) = patch.starts_at {
            self.starts_at = v;
        }
        if let Some(v) = patch.ends_at {
            self.ends_at = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EventStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Draft.can_transition_to(Scheduled));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Scheduled.can_transition_to(Completed));
        assert!(Scheduled.can_transition_to(Draft));
        assert!(Scheduled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in [Draft, Scheduled, Completed] {
            assert!(!Cancelled.can_transition_to(next));
        }
        for next in [Draft, Scheduled, Cancelled] {
            assert!(!Completed.can_transition_to(next));
        }
        assert!(Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_draft_cannot_complete() {
        assert!(!Draft.can_transition_to(Completed));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("scheduled".parse::<EventStatus>().unwrap(), Scheduled);
        assert!("archived".parse::<EventStatus>().is_err());
    }
}
