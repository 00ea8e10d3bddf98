//! DTOs for events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::event_service::CreateEvent;
use crate::domain::entities::{Event, EventPatch, EventStatus};
use crate::error::AppError;

const MAX_DESCRIPTION_LEN: u64 = 4000;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,

    pub venue_address_id: Option<Uuid>,

    pub starts_at: DateTime<Utc>,

    pub ends_at: DateTime<Utc>,

    /// Initial status, `draft` when omitted.
    pub status: Option<EventStatus>,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(req: CreateEventRequest) -> Self {
        CreateEvent {
            name: req.name,
            description: req.description,
            venue_address_id: req.venue_address_id,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            status: req.status,
        }
    }
}

/// Request body for `PATCH /api/events/{id}`.
///
/// # Nullable fields
///
/// `description` and `venue_address_id`:
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear
/// - **Value** → set
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub venue_address_id: Option<Option<Uuid>>,

    pub starts_at: Option<DateTime<Utc>>,

    pub ends_at: Option<DateTime<Utc>>,

    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    /// Field checks the derive cannot express on nullable fields.
    pub fn validate_nullable(&self) -> Result<(), AppError> {
        if let Some(Some(description)) = &self.description
            && description.chars().count() as u64 > MAX_DESCRIPTION_LEN
        {
            return Err(AppError::validation(
                "description",
                "Description must be at most 4000 characters",
            ));
        }
        Ok(())
    }
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        EventPatch {
            name: req.name,
            description: req.description,
            venue_address_id: req.venue_address_id,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            status: req.status,
        }
    }
}

/// Event list filters. The date range comes from
/// [`super::pagination::DateFilterParams`].
#[derive(Debug, Default, Deserialize)]
pub struct EventFilterParams {
    pub status: Option<EventStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
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

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            tenant_id: e.tenant_id,
            name: e.name,
            description: e.description,
            venue_address_id: e.venue_address_id,
            starts_at: e.starts_at,
            ends_at: e.ends_at,
            status: e.status,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
