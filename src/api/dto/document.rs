//! DTOs for document metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateUrl};

use crate::application::services::document_service::CreateDocument;
use crate::domain::entities::{Document, DocumentKind, DocumentPatch};
use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    pub kind: DocumentKind,

    /// Document number, unique per tenant (e.g. `INV-2025-0001`).
    #[validate(length(min = 1, max = 64, message = "Number must be 1-64 characters"))]
    pub number: String,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub event_id: Option<Uuid>,

    /// Location of the document content in external storage.
    #[validate(url(message = "Invalid URL format"))]
    pub content_url: Option<String>,

    /// Defaults to the time of creation.
    pub issued_at: Option<DateTime<Utc>>,
}

impl From<CreateDocumentRequest> for CreateDocument {
    fn from(req: CreateDocumentRequest) -> Self {
        CreateDocument {
            kind: req.kind,
            number: req.number,
            title: req.title,
            event_id: req.event_id,
            content_url: req.content_url,
            issued_at: req.issued_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    pub kind: Option<DocumentKind>,

    #[validate(length(min = 1, max = 64, message = "Number must be 1-64 characters"))]
    pub number: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub event_id: Option<Option<Uuid>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub content_url: Option<Option<String>>,

    pub issued_at: Option<DateTime<Utc>>,
}

impl UpdateDocumentRequest {
    /// Field checks the derive cannot express on nullable fields.
    pub fn validate_nullable(&self) -> Result<(), AppError> {
        if let Some(Some(url)) = &self.content_url
            && !url.validate_url()
        {
            return Err(AppError::validation("content_url", "Invalid URL format"));
        }
        Ok(())
    }
}

impl From<UpdateDocumentRequest> for DocumentPatch {
    fn from(req: UpdateDocumentRequest) -> Self {
        DocumentPatch {
            kind: req.kind,
            number: req.number,
            title: req.title,
            event_id: req.event_id,
            content_url: req.content_url,
            issued_at: req.issued_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentFilterParams {
    pub kind: Option<DocumentKind>,
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub kind: DocumentKind,
    pub number: String,
    pub title: String,
    pub event_id: Option<Uuid>,
    pub content_url: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            tenant_id: d.tenant_id,
            kind: d.kind,
            number: d.number,
            title: d.title,
            event_id: d.event_id,
            content_url: d.content_url,
            issued_at: d.issued_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}
