//! Document metadata service.

use chrono::{DateTime, Utc};

use crate::application::services::event_service::EventService;
use crate::domain::entities::{Document, DocumentKind, DocumentPatch, NewDocument, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{DocumentFilter, DocumentRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub title: String,
    pub event_id: Option<Uuid>,
    pub content_url: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Service for documents. Numbers are unique per tenant.
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    events: Arc<EventService>,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>, events: Arc<EventService>) -> Self {
        Self { repository, events }
    }

    pub async fn list_documents(
        &self,
        ctx: &TenantContext,
        kind: Option<DocumentKind>,
        event_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Document>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(
                DocumentFilter {
                    tenant_id,
                    kind,
                    event_id,
                },
                page,
            )
            .await
    }

    /// Creates a document; `issued_at` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the number is already used in the tenant.
    /// Returns [`AppError::BadRequest`] if the event is not in the tenant.
    pub async fn create_document(
        &self,
        ctx: &TenantContext,
        input: CreateDocument,
    ) -> Result<Document, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;
        self.ensure_number_free(tenant_id, &input.number, None).await?;
        if let Some(event_id) = input.event_id {
            self.events.ensure_reference(tenant_id, event_id).await?;
        }

        self.repository
            .create(NewDocument {
                tenant_id,
                kind: input.kind,
                number: input.number,
                title: input.title,
                event_id: input.event_id,
                content_url: input.content_url,
                issued_at: input.issued_at.unwrap_or_else(Utc::now),
            })
            .await
    }

    pub async fn get_document(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Document, AppError> {
        let document = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(document.tenant_id)?;
        Ok(document)
    }

    pub async fn update_document(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Document, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_document(ctx, id).await?;
        if let Some(number) = &patch.number {
            self.ensure_number_free(current.tenant_id, number, Some(id))
                .await?;
        }
        if let Some(Some(event_id)) = patch.event_id {
            self.events
                .ensure_reference(current.tenant_id, event_id)
                .await?;
        }
        self.repository.update(id, patch).await
    }

    pub async fn delete_document(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_document(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn ensure_number_free(
        &self,
        tenant_id: Uuid,
        number: &str,
        except: Option<Uuid>,
    ) -> Result<(), AppError> {
        match self.repository.find_by_number(tenant_id, number).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::conflict(
                "Document number already exists",
                json!({"number": number}),
            )),
            _ => Ok(()),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Document not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::address_service::AddressService;
    use crate::domain::repositories::{
        MockAddressRepository, MockDocumentRepository, MockEventRepository,
    };

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn document(id: Uuid, tenant_id: Uuid, number: &str) -> Document {
        let now = Utc::now();
        Document {
            id,
            tenant_id,
            kind: DocumentKind::Invoice,
            number: number.to_string(),
            title: "Invoice".to_string(),
            event_id: None,
            content_url: None,
            issued_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockDocumentRepository, events: MockEventRepository) -> DocumentService {
        let events = EventService::new(
            Arc::new(events),
            Arc::new(AddressService::new(Arc::new(MockAddressRepository::new()))),
        );
        DocumentService::new(Arc::new(repo), Arc::new(events))
    }

    fn input(event_id: Option<Uuid>) -> CreateDocument {
        CreateDocument {
            kind: DocumentKind::Invoice,
            number: "INV-1".to_string(),
            title: "Invoice".to_string(),
            event_id,
            content_url: None,
            issued_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_document_duplicate_number() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_number()
            .returning(|tenant, number| Ok(Some(document(Uuid::new_v4(), tenant, number))));
        repo.expect_create().never();

        let result = service(repo, MockEventRepository::new())
            .create_document(&ctx(Role::Manager, Uuid::new_v4()), input(None))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_document_with_unknown_event() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_number().returning(|_, _| Ok(None));
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo, events)
            .create_document(&ctx(Role::Manager, Uuid::new_v4()), input(Some(Uuid::new_v4())))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_create_document_defaults_issue_date() {
        let tenant = Uuid::new_v4();
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_number().returning(|_, _| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|d| Ok(document(Uuid::new_v4(), d.tenant_id, &d.number)));

        let result = service(repo, MockEventRepository::new())
            .create_document(&ctx(Role::TenantAdmin, tenant), input(None))
            .await;

        assert_eq!(result.unwrap().tenant_id, tenant);
    }
}
