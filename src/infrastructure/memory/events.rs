use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate};
use crate::domain::entities::{Event, EventPatch, NewEvent};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{EventFilter, EventRepository};
use crate::error::AppError;

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, new_event: NewEvent) -> Result<Event, AppError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            tenant_id: new_event.tenant_id,
            name: new_event.name,
            description: new_event.description,
            venue_address_id: new_event.venue_address_id,
            starts_at: new_event.starts_at,
            ends_at: new_event.ends_at,
            status: new_event.status,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.events,
            |e| filter.matches(e),
            |a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| missing("Event", id))?;
        event.apply(patch, Utc::now());
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        if tables.events.len() == before {
            return Ok(false);
        }

        for team in tables.teams.iter_mut().filter(|t| t.event_id == Some(id)) {
            team.event_id = None;
        }
        for document in tables
            .documents
            .iter_mut()
            .filter(|d| d.event_id == Some(id))
        {
            document.event_id = None;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EventStatus, NewTeam};
    use crate::domain::repositories::TeamRepository;
    use chrono::Duration;

    #[tokio::test]
    async fn test_delete_clears_team_reference() {
        let store = MemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let now = Utc::now();
        let event = EventRepository::create(
            &store,
            NewEvent {
                tenant_id,
                name: "Launch".to_string(),
                description: None,
                venue_address_id: None,
                starts_at: now,
                ends_at: now + Duration::hours(2),
                status: EventStatus::Draft,
            },
        )
        .await
        .unwrap();
        let team = TeamRepository::create(
            &store,
            NewTeam {
                tenant_id,
                event_id: Some(event.id),
                name: "Crew".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(EventRepository::delete(&store, event.id).await.unwrap());

        let team = TeamRepository::find_by_id(&store, team.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(team.event_id, None);
    }
}
