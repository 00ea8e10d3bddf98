//! Repository trait for products.

use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub tenant_id: Uuid,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl ProductFilter {
    pub fn matches(&self, p: &Product) -> bool {
        p.tenant_id == self.tenant_id
            && self.is_active.is_none_or(|a| p.is_active == a)
            && self.search.as_deref().is_none_or(|s| {
                let s = s.to_lowercase();
                p.name.to_lowercase().contains(&s) || p.sku.to_lowercase().contains(&s)
            })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the SKU already exists for the tenant.
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn find_by_sku(&self, tenant_id: Uuid, sku: &str) -> Result<Option<Product>, AppError>;

    /// Lists products ordered by name.
    async fn list(&self, filter: ProductFilter, page: PageRequest)
    -> Result<Page<Product>, AppError>;

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if stock levels or price-list items
    /// still reference the product.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
