//! Tenant entity: an organization owning all tenant-scoped data.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An organization using the system.
///
/// Tenants are soft-deleted: `deleted_at IS NOT NULL` means deleted. Users of a
/// deleted or inactive tenant can no longer authenticate.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Active and not deleted.
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_deleted()
    }
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
