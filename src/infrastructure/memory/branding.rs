use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::MemoryStore;
use crate::domain::entities::{Branding, BrandingUpdate};
use crate::domain::repositories::BrandingRepository;
use crate::error::AppError;

#[async_trait]
impl BrandingRepository for MemoryStore {
    async fn find(&self, tenant_id: Uuid) -> Result<Option<Branding>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.branding.get(&tenant_id).cloned())
    }

    async fn upsert(&self, tenant_id: Uuid, update: BrandingUpdate) -> Result<Branding, AppError> {
        let branding = Branding {
            tenant_id,
            app_name: update.app_name,
            primary_color: update.primary_color,
            secondary_color: update.secondary_color,
            logo_url: update.logo_url,
            favicon_url: update.favicon_url,
            updated_at: Utc::now(),
        };
        let mut tables = self.tables.write().await;
        tables.branding.insert(tenant_id, branding.clone());
        Ok(branding)
    }
}
