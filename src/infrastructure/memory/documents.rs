use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate, unique_violation};
use crate::domain::entities::{Document, DocumentPatch, NewDocument};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{DocumentFilter, DocumentRepository};
use crate::error::AppError;

const NUMBER_CONSTRAINT: &str = "documents_tenant_id_number_key";

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn create(&self, new_document: NewDocument) -> Result<Document, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .documents
            .iter()
            .any(|d| d.tenant_id == new_document.tenant_id && d.number == new_document.number)
        {
            return Err(unique_violation(NUMBER_CONSTRAINT));
        }

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            tenant_id: new_document.tenant_id,
            kind: new_document.kind,
            number: new_document.number,
            title: new_document.title,
            event_id: new_document.event_id,
            content_url: new_document.content_url,
            issued_at: new_document.issued_at,
            created_at: now,
            updated_at: now,
        };
        tables.documents.push(document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_number(
        &self,
        tenant_id: Uuid,
        number: &str,
    ) -> Result<Option<Document>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.tenant_id == tenant_id && d.number == number)
            .cloned())
    }

    async fn list(
        &self,
        filter: DocumentFilter,
        page: PageRequest,
    ) -> Result<Page<Document>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.documents,
            |d| filter.matches(d),
            |a, b| b.issued_at.cmp(&a.issued_at).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, AppError> {
        let mut tables = self.tables.write().await;
        let tenant_id = tables
            .documents
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.tenant_id)
            .ok_or_else(|| missing("Document", id))?;
        if let Some(number) = &patch.number
            && tables
                .documents
                .iter()
                .any(|d| d.id != id && d.tenant_id == tenant_id && &d.number == number)
        {
            return Err(unique_violation(NUMBER_CONSTRAINT));
        }

        let document = tables
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| missing("Document", id))?;
        document.apply(patch, Utc::now());
        Ok(document.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.documents.len();
        tables.documents.retain(|d| d.id != id);
        Ok(tables.documents.len() != before)
    }
}
