//! Business document metadata (invoices, receipts, delivery notes, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Receipt,
    DeliveryNote,
    Contract,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Receipt => "receipt",
            DocumentKind::DeliveryNote => "delivery_note",
            DocumentKind::Contract => "contract",
            DocumentKind::Other => "other",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(DocumentKind::Invoice),
            "receipt" => Ok(DocumentKind::Receipt),
            "delivery_note" => Ok(DocumentKind::DeliveryNote),
            "contract" => Ok(DocumentKind::Contract),
            "other" => Ok(DocumentKind::Other),
            other => Err(UnknownVariant::new("document kind", other)),
        }
    }
}

/// Document metadata. `number` is unique per tenant.
#[derive(Debug, Clone)]
pub struct Document {
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

impl Document {
    pub fn apply(&mut self, patch: DocumentPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.number {
            self.number = v;
        }
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.event_id {
            self.event_id = v;
        }
        if let Some(v) = patch.content_url {
            self.content_url = v;
        }
        if let Some(v) = patch.issued_at {
            self.issued_at = v;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub tenant_id: Uuid,
    pub kind: DocumentKind,
    pub number: String,
    pub title: String,
    pub event_id: Option<Uuid>,
    pub content_url: Option<String>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub kind: Option<DocumentKind>,
    pub number: Option<String>,
    pub title: Option<String>,
    pub event_id: Option<Option<Uuid>>,
    pub content_url: Option<Option<String>>,
    pub issued_at: Option<DateTime<Utc>>,
}
