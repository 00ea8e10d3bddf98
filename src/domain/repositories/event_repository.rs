//! Repository trait for events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Event, EventPatch, EventStatus, NewEvent};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter for listing events of one tenant.
///
/// `from`/`to` select events overlapping the window: an event matches when it
/// ends at or after `from` and starts at or before `to`.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub tenant_id: Uuid,
    pub status: Option<EventStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl EventFilter {
    pub fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            status: None,
            from: None,
            to: None,
            search: None,
        }
    }

    pub fn with_status(mut self, status: Option<EventStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_window(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn matches(&self, e: &Event) -> bool {
        e.tenant_id == self.tenant_id
            && self.status.is_none_or(|s| e.status == s)
            && self.from.is_none_or(|from| e.ends_at >= from)
            && self.to.is_none_or(|to| e.starts_at <= to)
            && self
                .search
                .as_deref()
                .is_none_or(|s| e.name.to_lowercase().contains(&s.to_lowercase()))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, new_event: NewEvent) -> Result<Event, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    /// Lists events ordered by start time.
    async fn list(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the event does not exist.
    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, AppError>;

    /// Deletes an event; teams and documents referencing it are detached.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
