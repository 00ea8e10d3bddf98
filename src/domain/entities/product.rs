//! Product entity: a sellable / stockable item identified by a tenant-unique SKU.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.sku {
            self.sku = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.unit {
            self.unit = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub tenant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
}
