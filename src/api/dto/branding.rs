//! DTOs for tenant branding.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Branding, BrandingUpdate};

static COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Request body for `PUT /api/branding`; replaces the stored branding.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandingRequest {
    #[validate(length(min = 1, max = 100, message = "App name must be 1-100 characters"))]
    pub app_name: String,

    #[validate(regex(path = "*COLOR_REGEX", message = "Color must be #RRGGBB"))]
    pub primary_color: String,

    #[validate(regex(path = "*COLOR_REGEX", message = "Color must be #RRGGBB"))]
    pub secondary_color: String,

    #[validate(url(message = "Invalid URL format"))]
    pub logo_url: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub favicon_url: Option<String>,
}

impl From<UpdateBrandingRequest> for BrandingUpdate {
    fn from(req: UpdateBrandingRequest) -> Self {
        BrandingUpdate {
            app_name: req.app_name,
            primary_color: req.primary_color,
            secondary_color: req.secondary_color,
            logo_url: req.logo_url,
            favicon_url: req.favicon_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BrandingResponse {
    pub tenant_id: Uuid,
    pub app_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Branding> for BrandingResponse {
    fn from(b: Branding) -> Self {
        Self {
            tenant_id: b.tenant_id,
            app_name: b.app_name,
            primary_color: b.primary_color,
            secondary_color: b.secondary_color,
            logo_url: b.logo_url,
            favicon_url: b.favicon_url,
            updated_at: b.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(primary: &str) -> UpdateBrandingRequest {
        UpdateBrandingRequest {
            app_name: "Acme".to_string(),
            primary_color: primary.to_string(),
            secondary_color: "#ffffff".to_string(),
            logo_url: Some("https://cdn.example.com/logo.svg".to_string()),
            favicon_url: None,
        }
    }

    #[test]
    fn test_color_format() {
        assert!(request("#1F2937").validate().is_ok());
        assert!(request("1F2937").validate().is_err());
        assert!(request("#1F293").validate().is_err());
        assert!(request("#GGGGGG").validate().is_err());
    }
}
