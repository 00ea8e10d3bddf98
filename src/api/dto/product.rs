//! DTOs for the product catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::product_service::CreateProduct;
use crate::domain::entities::{Product, ProductPatch};
use crate::error::AppError;

fn default_unit() -> String {
    "pcs".to_string()
}

const MAX_DESCRIPTION_LEN: u64 = 4000;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Stock keeping unit, unique per tenant.
    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: String,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,

    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        CreateProduct {
            sku: req.sku,
            name: req.name,
            description: req.description,
            unit: req.unit,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[validate(length(min = 1, max = 32))]
    pub unit: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    /// Field checks the derive cannot express on nullable fields.
    pub fn validate_nullable(&self) -> Result<(), AppError> {
        if let Some(Some(description)) = &self.description
            && description.chars().count() as u64 > MAX_DESCRIPTION_LEN
        {
            return Err(AppError::validation(
                "description",
                "Description must be at most 4000 characters",
            ));
        }
        Ok(())
    }
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            sku: req.sku,
            name: req.name,
            description: req.description,
            unit: req.unit,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilterParams {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            tenant_id: p.tenant_id,
            sku: p.sku,
            name: p.name,
            description: p.description,
            unit: p.unit,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
