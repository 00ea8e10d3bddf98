//! Event management service, including status lifecycle rules.

use chrono::{DateTime, Utc};

use crate::application::services::address_service::AddressService;
use crate::domain::entities::{Event, EventPatch, EventStatus, NewEvent, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{EventFilter, EventRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub description: Option<String>,
    pub venue_address_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: Option<EventStatus>,
}

/// Optional list filters, applied within the active tenant.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

/// Service for events.
///
/// # Lifecycle
///
/// `draft → scheduled | cancelled`, `scheduled → draft | completed | cancelled`.
/// `cancelled` and `completed` are terminal: a terminal event accepts no
/// further changes, and moving to a disallowed status is a conflict.
pub struct EventService {
    repository: Arc<dyn EventRepository>,
    addresses: Arc<AddressService>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>, addresses: Arc<AddressService>) -> Self {
        Self {
            repository,
            addresses,
        }
    }

    pub async fn list_events(
        &self,
        ctx: &TenantContext,
        query: EventQuery,
        page: PageRequest,
    ) -> Result<Page<Event>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        if let (Some(from), Some(to)) = (query.from, query.to)
            && to < from
        {
            return Err(AppError::validation("to", "to must not be before from"));
        }

        let filter = EventFilter::new(tenant_id)
            .with_status(query.status)
            .with_window(query.from, query.to)
            .with_search(query.search);
        self.repository.list(filter, page).await
    }

    /// Creates an event; status defaults to `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `ends_at` precedes `starts_at` or
    /// the initial status is terminal.
    /// Returns [`AppError::BadRequest`] if the venue is not an address of the tenant.
    pub async fn create_event(
        &self,
        ctx: &TenantContext,
        input: CreateEvent,
    ) -> Result<Event, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;

        validate_window(input.starts_at, input.ends_at)?;
        let status = input.status.unwrap_or(EventStatus::Draft);
        if status.is_terminal() {
            return Err(AppError::validation(
                "status",
                "New events must be draft or scheduled",
            ));
        }
        if let Some(venue) = input.venue_address_id {
            self.addresses.ensure_reference(tenant_id, venue).await?;
        }

        let event = self
            .repository
            .create(NewEvent {
                tenant_id,
                name: input.name,
                description: input.description,
                venue_address_id: input.venue_address_id,
                starts_at: input.starts_at,
                ends_at: input.ends_at,
                status,
            })
            .await?;
        tracing::debug!(event_id = %event.id, "Event created");
        Ok(event)
    }

    pub async fn get_event(&self, ctx: &TenantContext, id: Uuid) -> Result<Event, AppError> {
        let event = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(event.tenant_id)?;
        Ok(event)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the event is terminal or the status
    /// transition is not allowed.
    /// Returns [`AppError::Validation`] if the resulting window is inverted.
    pub async fn update_event(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<Event, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_event(ctx, id).await?;

        if current.status.is_terminal() {
            return Err(AppError::conflict(
                "Event is in a terminal status and cannot be modified",
                json!({"status": current.status.as_str()}),
            ));
        }
        if let Some(next) = patch.status
            && !current.status.can_transition_to(next)
        {
            return Err(AppError::conflict(
                "Event status transition is not allowed",
                json!({"from": current.status.as_str(), "to": next.as_str()}),
            ));
        }

        validate_window(
            patch.starts_at.unwrap_or(current.starts_at),
            patch.ends_at.unwrap_or(current.ends_at),
        )?;
        if let Some(Some(venue)) = patch.venue_address_id {
            self.addresses
                .ensure_reference(current.tenant_id, venue)
                .await?;
        }

        self.repository.update(id, patch).await
    }

    pub async fn delete_event(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_event(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Checks that an event referenced by another entity exists in `tenant_id`.
    pub async fn ensure_reference(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        match self.repository.find_by_id(id).await? {
            Some(e) if e.tenant_id == tenant_id => Ok(()),
            _ => Err(AppError::bad_request(
                "Referenced event does not exist in this tenant",
                json!({"event_id": id}),
            )),
        }
    }
}

fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if ends_at < starts_at {
        return Err(AppError::validation(
            "ends_at",
            "ends_at must not be before starts_at",
        ));
    }
    Ok(())
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Event not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockAddressRepository, MockEventRepository};
    use chrono::Duration;

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn event(id: Uuid, tenant_id: Uuid, status: EventStatus) -> Event {
        let now = Utc::now();
        Event {
            id,
            tenant_id,
            name: "Launch".to_string(),
            description: None,
            venue_address_id: None,
            starts_at: now,
            ends_at: now + Duration::hours(2),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockEventRepository, addresses: MockAddressRepository) -> EventService {
        EventService::new(
            Arc::new(repo),
            Arc::new(AddressService::new(Arc::new(addresses))),
        )
    }

    fn create_input(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> CreateEvent {
        CreateEvent {
            name: "Launch".to_string(),
            description: None,
            venue_address_id: None,
            starts_at,
            ends_at,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_event_defaults_to_draft() {
        let tenant = Uuid::new_v4();
        let mut repo = MockEventRepository::new();
        repo.expect_create()
            .withf(|e| e.status == EventStatus::Draft)
            .times(1)
            .returning(|e| Ok(event(Uuid::new_v4(), e.tenant_id, e.status)));

        let now = Utc::now();
        let result = service(repo, MockAddressRepository::new())
            .create_event(
                &ctx(Role::Manager, tenant),
                create_input(now, now + Duration::hours(1)),
            )
            .await;

        assert_eq!(result.unwrap().status, EventStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_event_rejects_inverted_window() {
        let now = Utc::now();
        let result = service(MockEventRepository::new(), MockAddressRepository::new())
            .create_event(
                &ctx(Role::Manager, Uuid::new_v4()),
                create_input(now, now - Duration::hours(1)),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_event_with_foreign_venue() {
        let mut addresses = MockAddressRepository::new();
        addresses.expect_find_by_id().returning(|_| Ok(None));

        let now = Utc::now();
        let mut input = create_input(now, now);
        input.venue_address_id = Some(Uuid::new_v4());

        let result = service(MockEventRepository::new(), addresses)
            .create_event(&ctx(Role::Manager, Uuid::new_v4()), input)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_terminal_event_cannot_change() {
        let tenant = Uuid::new_v4();
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(event(id, tenant, EventStatus::Cancelled))));
        repo.expect_update().never();

        let result = service(repo, MockAddressRepository::new())
            .update_event(
                &ctx(Role::Manager, tenant),
                Uuid::new_v4(),
                EventPatch {
                    status: Some(EventStatus::Scheduled),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_draft_cannot_complete() {
        let tenant = Uuid::new_v4();
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(event(id, tenant, EventStatus::Draft))));

        let result = service(repo, MockAddressRepository::new())
            .update_event(
                &ctx(Role::Manager, tenant),
                Uuid::new_v4(),
                EventPatch {
                    status: Some(EventStatus::Completed),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_schedule_draft_event() {
        let tenant = Uuid::new_v4();
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(event(id, tenant, EventStatus::Draft))));
        repo.expect_update()
            .times(1)
            .returning(move |id, _| Ok(event(id, tenant, EventStatus::Scheduled)));

        let result = service(repo, MockAddressRepository::new())
            .update_event(
                &ctx(Role::Manager, tenant),
                Uuid::new_v4(),
                EventPatch {
                    status: Some(EventStatus::Scheduled),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(result.unwrap().status, EventStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_get_event_of_other_tenant_is_forbidden() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(event(id, Uuid::new_v4(), EventStatus::Draft))));

        let result = service(repo, MockAddressRepository::new())
            .get_event(&ctx(Role::Staff, Uuid::new_v4()), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }
}
