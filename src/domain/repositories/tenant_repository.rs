//! Repository trait for tenants.

use crate::domain::entities::{NewTenant, Tenant, TenantPatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for tenants.
///
/// Lookups by id and slug do NOT filter soft-deleted rows; the service decides
/// what a deleted tenant means for the caller. Listing never shows them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is taken.
    async fn create(&self, new_tenant: NewTenant) -> Result<Tenant, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;

    /// Lists non-deleted tenants ordered by name, optionally filtered by a
    /// case-insensitive substring of name or slug.
    async fn list(&self, search: Option<String>, page: PageRequest)
    -> Result<Page<Tenant>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tenant does not exist.
    async fn update(&self, id: Uuid, patch: TenantPatch) -> Result<Tenant, AppError>;

    /// Soft-deletes a tenant. Returns `false` if missing or already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
