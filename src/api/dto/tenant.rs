//! DTOs for tenant management.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{NewTenant, Tenant, TenantPatch};

/// Compiled regex for tenant slugs.
pub static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,62}$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Lower-case, URL-safe identifier used for the public branding lookup.
    #[validate(regex(
        path = "*SLUG_REGEX",
        message = "Slug must be 2-63 characters of a-z, 0-9 and '-', not starting with '-'"
    ))]
    pub slug: String,
}

impl From<CreateTenantRequest> for NewTenant {
    fn from(req: CreateTenantRequest) -> Self {
        NewTenant {
            name: req.name,
            slug: req.slug,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateTenantRequest> for TenantPatch {
    fn from(req: UpdateTenantRequest) -> Self {
        TenantPatch {
            name: req.name,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TenantSearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
            is_active: t.is_active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(slug: &str) -> CreateTenantRequest {
        CreateTenantRequest {
            name: "Acme".to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_slug_rules() {
        assert!(request("acme").validate().is_ok());
        assert!(request("acme-events-2").validate().is_ok());
        assert!(request("a").validate().is_err());
        assert!(request("-acme").validate().is_err());
        assert!(request("Acme").validate().is_err());
        assert!(request(&"a".repeat(64)).validate().is_err());
    }
}
