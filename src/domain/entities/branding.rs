//! Per-tenant branding (name, colors, logos) used to theme client apps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PRIMARY_COLOR: &str = "#1F2937";
pub const DEFAULT_SECONDARY_COLOR: &str = "#F59E0B";

/// Branding of a tenant.
///
/// Serializable because it is stored in the cache as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub tenant_id: Uuid,
    pub app_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Branding {
    /// Branding served for tenants that never stored one.
    pub fn default_for(tenant_id: Uuid, tenant_name: &str) -> Self {
        Self {
            tenant_id,
            app_name: tenant_name.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            logo_url: None,
            favicon_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Full replacement of a tenant's branding.
#[derive(Debug, Clone)]
pub struct BrandingUpdate {
    pub app_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
}
