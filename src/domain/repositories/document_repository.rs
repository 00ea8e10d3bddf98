//! Repository trait for documents.

use crate::domain::entities::{Document, DocumentKind, DocumentPatch, NewDocument};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DocumentFilter {
    pub tenant_id: Uuid,
    pub kind: Option<DocumentKind>,
    pub event_id: Option<Uuid>,
}

impl DocumentFilter {
    pub fn matches(&self, d: &Document) -> bool {
        d.tenant_id == self.tenant_id
            && self.kind.is_none_or(|k| d.kind == k)
            && self.event_id.is_none_or(|e| d.event_id == Some(e))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the number already exists for the tenant.
    async fn create(&self, new_document: NewDocument) -> Result<Document, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    async fn find_by_number(
        &self,
        tenant_id: Uuid,
        number: &str,
    ) -> Result<Option<Document>, AppError>;

    /// Lists documents, newest issue date first.
    async fn list(
        &self,
        filter: DocumentFilter,
        page: PageRequest,
    ) -> Result<Page<Document>, AppError>;

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
