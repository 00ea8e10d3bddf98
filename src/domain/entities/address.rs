//! Postal address owned by a tenant (event venues, warehouse locations).

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2, upper-case.
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub tenant_id: Uuid,
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub label: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<Option<String>>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Applies a patch in place. Used by the in-memory backend.
    pub fn apply(&mut self, patch: AddressPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.label {
            self.label = v;
        }
        if let Some(v) = patch.line1 {
            self.line1 = v;
        }
        if let Some(v) = patch.line2 {
            self.line2 = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.postal_code {
            self.postal_code = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        self.updated_at = now;
    }
}
