//! Tenant branding service with a read-through cache for the public lookup.

use crate::domain::entities::{Branding, BrandingUpdate, Role};
use crate::domain::repositories::{BrandingRepository, TenantRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Cache key for the public branding of the tenant with `slug`.
pub fn branding_cache_key(slug: &str) -> String {
    format!("branding:{slug}")
}

/// Service for tenant branding.
///
/// Tenants without stored branding get [`Branding::default_for`]. The public
/// lookup by slug is served from the cache when possible; updates invalidate
/// the cached entry.
pub struct BrandingService {
    repository: Arc<dyn BrandingRepository>,
    tenants: Arc<dyn TenantRepository>,
    cache: Arc<dyn CacheService>,
}

impl BrandingService {
    pub fn new(
        repository: Arc<dyn BrandingRepository>,
        tenants: Arc<dyn TenantRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            repository,
            tenants,
            cache,
        }
    }

    /// Branding of the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without tenant context.
    /// Returns [`AppError::NotFound`] if the tenant no longer exists.
    pub async fn get_branding(&self, ctx: &TenantContext) -> Result<Branding, AppError> {
        let tenant_id = ctx.require_tenant()?;
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found("Tenant not found", json!({"id": tenant_id})))?;

        Ok(self
            .repository
            .find(tenant_id)
            .await?
            .unwrap_or_else(|| Branding::default_for(tenant.id, &tenant.name)))
    }

    /// Replaces the branding of the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without tenant context or below TenantAdmin.
    pub async fn update_branding(
        &self,
        ctx: &TenantContext,
        update: BrandingUpdate,
    ) -> Result<Branding, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::TenantAdmin)?;
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found("Tenant not found", json!({"id": tenant_id})))?;

        let branding = self.repository.upsert(tenant_id, update).await?;
        if let Err(e) = self.cache.invalidate(&branding_cache_key(&tenant.slug)).await {
            warn!(error = %e, slug = %tenant.slug, "Failed to invalidate branding cache");
        }
        Ok(branding)
    }

    /// Public branding lookup by tenant slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown, inactive or deleted tenants.
    pub async fn public_branding(&self, slug: &str) -> Result<Branding, AppError> {
        let key = branding_cache_key(slug);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Branding>(&cached) {
                Ok(branding) => return Ok(branding),
                Err(e) => warn!(error = %e, key, "Discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, key, "Cache lookup failed"),
        }

        let tenant = self
            .tenants
            .find_by_slug(slug)
            .await?
            .filter(|t| t.is_usable())
            .ok_or_else(|| AppError::not_found("Tenant not found", json!({"slug": slug})))?;

        let branding = self
            .repository
            .find(tenant.id)
            .await?
            .unwrap_or_else(|| Branding::default_for(tenant.id, &tenant.name));

        match serde_json::to_string(&branding) {
            Ok(value) => {
                if let Err(e) = self.cache.set(&key, &value, None).await {
                    warn!(error = %e, key, "Failed to cache branding");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize branding"),
        }

        Ok(branding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Tenant;
    use crate::domain::repositories::{MockBrandingRepository, MockTenantRepository};
    use crate::infrastructure::cache::{MockCacheService, NullCache};
    use chrono::Utc;
    use uuid::Uuid;

    fn tenant(slug: &str, is_active: bool) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme Events".to_string(),
            slug: slug.to_string(),
            is_active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(branding_cache_key("acme"), "branding:acme");
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_stored() {
        let t = tenant("acme", true);
        let tenant_id = t.id;
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        let mut repo = MockBrandingRepository::new();
        repo.expect_find().returning(|_| Ok(None));

        let branding = BrandingService::new(
            Arc::new(repo),
            Arc::new(tenants),
            Arc::new(NullCache::new()),
        )
        .get_branding(&ctx(Role::Staff, tenant_id))
        .await
        .unwrap();

        assert_eq!(branding.app_name, "Acme Events");
        assert_eq!(branding.tenant_id, tenant_id);
    }

    #[tokio::test]
    async fn test_public_branding_served_from_cache() {
        let cached = Branding::default_for(Uuid::new_v4(), "Cached");
        let body = serde_json::to_string(&cached).unwrap();

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|key| key == "branding:acme")
            .returning(move |_| Ok(Some(body.clone())));
        let mut tenants = MockTenantRepository::new();
        tenants.expect_find_by_slug().never();

        let branding = BrandingService::new(
            Arc::new(MockBrandingRepository::new()),
            Arc::new(tenants),
            Arc::new(cache),
        )
        .public_branding("acme")
        .await
        .unwrap();

        assert_eq!(branding, cached);
    }

    #[tokio::test]
    async fn test_public_branding_populates_cache_on_miss() {
        let t = tenant("acme", true);
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, _, ttl| key == "branding:acme" && ttl.is_none())
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_slug()
            .returning(move |_| Ok(Some(t.clone())));
        let mut repo = MockBrandingRepository::new();
        repo.expect_find().returning(|_| Ok(None));

        let result = BrandingService::new(Arc::new(repo), Arc::new(tenants), Arc::new(cache))
            .public_branding("acme")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_public_branding_of_inactive_tenant() {
        let t = tenant("acme", false);
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_slug()
            .returning(move |_| Ok(Some(t.clone())));

        let result = BrandingService::new(
            Arc::new(MockBrandingRepository::new()),
            Arc::new(tenants),
            Arc::new(NullCache::new()),
        )
        .public_branding("acme")
        .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_requires_tenant_admin() {
        let result = BrandingService::new(
            Arc::new(MockBrandingRepository::new()),
            Arc::new(MockTenantRepository::new()),
            Arc::new(NullCache::new()),
        )
        .update_branding(
            &ctx(Role::Manager, Uuid::new_v4()),
            BrandingUpdate {
                app_name: "Acme".to_string(),
                primary_color: "#000000".to_string(),
                secondary_color: "#FFFFFF".to_string(),
                logo_url: None,
                favicon_url: None,
            },
        )
        .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let t = tenant("acme", true);
        let tenant_id = t.id;
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        let mut repo = MockBrandingRepository::new();
        repo.expect_upsert().returning(|tenant_id, u| {
            Ok(Branding {
                tenant_id,
                app_name: u.app_name,
                primary_color: u.primary_color,
                secondary_color: u.secondary_color,
                logo_url: u.logo_url,
                favicon_url: u.favicon_url,
                updated_at: Utc::now(),
            })
        });
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|key| key == "branding:acme")
            .times(1)
            .returning(|_| Ok(()));

        let branding = BrandingService::new(Arc::new(repo), Arc::new(tenants), Arc::new(cache))
            .update_branding(
                &ctx(Role::TenantAdmin, tenant_id),
                BrandingUpdate {
                    app_name: "Acme".to_string(),
                    primary_color: "#000000".to_string(),
                    secondary_color: "#FFFFFF".to_string(),
                    logo_url: None,
                    favicon_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(branding.app_name, "Acme");
    }
}
