//! Repository trait for tenant branding.

use crate::domain::entities::{Branding, BrandingUpdate};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandingRepository: Send + Sync {
    /// Stored branding of a tenant, `None` if never set.
    async fn find(&self, tenant_id: Uuid) -> Result<Option<Branding>, AppError>;

    /// Creates or fully replaces the branding of a tenant.
    async fn upsert(&self, tenant_id: Uuid, update: BrandingUpdate) -> Result<Branding, AppError>;
}
