use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate, unique_violation};
use crate::domain::entities::{NewTenant, Tenant, TenantPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::TenantRepository;
use crate::error::AppError;

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn create(&self, new_tenant: NewTenant) -> Result<Tenant, AppError> {
        let mut tables = self.tables.write().await;
        if tables.tenants.iter().any(|t| t.slug == new_tenant.slug) {
            return Err(unique_violation("tenants_slug_key"));
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: new_tenant.name,
            slug: new_tenant.slug,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().find(|t| t.slug == slug).cloned())
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Tenant>, AppError> {
        let search = search.map(|s| s.to_lowercase());
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.tenants,
            |t| {
                !t.is_deleted()
                    && search.as_deref().is_none_or(|s| {
                        t.name.to_lowercase().contains(s) || t.slug.contains(s)
                    })
            },
            |a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: TenantPatch) -> Result<Tenant, AppError> {
        let mut tables = self.tables.write().await;
        let tenant = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == id && !t.is_deleted())
            .ok_or_else(|| missing("Tenant", id))?;

        if let Some(name) = patch.name {
            tenant.name = name;
        }
        if let Some(is_active) = patch.is_active {
            tenant.is_active = is_active;
        }
        tenant.updated_at = Utc::now();
        Ok(tenant.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .tenants
            .iter_mut()
            .find(|t| t.id == id && !t.is_deleted())
        {
            Some(tenant) => {
                let now = Utc::now();
                tenant.deleted_at = Some(now);
                tenant.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
