//! Tenant management service.

use crate::application::services::branding_service::branding_cache_key;
use crate::domain::entities::{NewTenant, Tenant, TenantPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::TenantRepository;
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Service for managing tenants.
///
/// Creating, listing, updating and deleting tenants is reserved to super
/// admins. Tenant users may read their own tenant only.
pub struct TenantService {
    repository: Arc<dyn TenantRepository>,
    cache: Arc<dyn CacheService>,
}

impl TenantService {
    pub fn new(repository: Arc<dyn TenantRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Creates a new tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the caller is a super admin.
    /// Returns [`AppError::Conflict`] if the slug is already taken (deleted
    /// tenants keep their slug).
    pub async fn create_tenant(
        &self,
        ctx: &TenantContext,
        new_tenant: NewTenant,
    ) -> Result<Tenant, AppError> {
        ctx.require_super_admin()?;

        if self
            .repository
            .find_by_slug(&new_tenant.slug)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Tenant slug already exists",
                json!({"slug": new_tenant.slug}),
            ));
        }

        let tenant = self.repository.create(new_tenant).await?;
        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant created");
        Ok(tenant)
    }

    /// Lists tenants that are not deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the caller is a super admin.
    pub async fn list_tenants(
        &self,
        ctx: &TenantContext,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Tenant>, AppError> {
        ctx.require_super_admin()?;
        self.repository.list(search, page).await
    }

    /// Retrieves a tenant by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when a tenant user asks for another tenant.
    /// Returns [`AppError::NotFound`] if the tenant does not exist or is deleted.
    pub async fn get_tenant(&self, ctx: &TenantContext, id: Uuid) -> Result<Tenant, AppError> {
        ctx.ensure_access(id)?;
        self.load(id).await
    }

    /// Retrieves the tenant the request operates on.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when the request has no tenant context.
    pub async fn current_tenant(&self, ctx: &TenantContext) -> Result<Tenant, AppError> {
        let id = ctx.require_tenant()?;
        self.load(id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the caller is a super admin.
    /// Returns [`AppError::NotFound`] if the tenant does not exist or is deleted.
    pub async fn update_tenant(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: TenantPatch,
    ) -> Result<Tenant, AppError> {
        ctx.require_super_admin()?;
        let existing = self.load(id).await?;

        let updated = self.repository.update(id, patch).await?;
        self.invalidate_branding(&existing.slug).await;
        Ok(updated)
    }

    /// Soft-deletes a tenant. Its users can no longer authenticate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the caller is a super admin.
    /// Returns [`AppError::NotFound`] if the tenant does not exist or is
    /// already deleted.
    pub async fn delete_tenant(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_super_admin()?;
        let existing = self.load(id).await?;

        if !self.repository.soft_delete(id).await? {
            return Err(AppError::not_found("Tenant not found", json!({"id": id})));
        }
        self.invalidate_branding(&existing.slug).await;
        tracing::info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }

    /// Round trip to storage, used by the health check.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn load(&self, id: Uuid) -> Result<Tenant, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found("Tenant not found", json!({"id": id})))
    }

    async fn invalidate_branding(&self, slug: &str) {
        if let Err(e) = self.cache.invalidate(&branding_cache_key(slug)).await {
            tracing::warn!(error = %e, slug, "Failed to invalidate branding cache");
        }
    }
}
