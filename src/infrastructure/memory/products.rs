use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate, unique_violation};
use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ProductFilter, ProductRepository};
use crate::error::AppError;

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .products
            .iter()
            .any(|p| p.tenant_id == new_product.tenant_id && p.sku == new_product.sku)
        {
            return Err(unique_violation("products_tenant_id_sku_key"));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            tenant_id: new_product.tenant_id,
            sku: new_product.sku,
            name: new_product.name,
            description: new_product.description,
            unit: new_product.unit,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_sku(&self, tenant_id: Uuid, sku: &str) -> Result<Option<Product>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.sku == sku)
            .cloned())
    }

    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.products,
            |p| filter.matches(p),
            |a, b| a.sku.cmp(&b.sku),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        let tenant_id = tables
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.tenant_id)
            .ok_or_else(|| missing("Product", id))?;
        if let Some(sku) = &patch.sku
            && tables
                .products
                .iter()
                .any(|p| p.id != id && p.tenant_id == tenant_id && &p.sku == sku)
        {
            return Err(unique_violation("products_tenant_id_sku_key"));
        }

        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| missing("Product", id))?;
        product.apply(patch, Utc::now());
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.products.iter().any(|p| p.id == id) {
            return Ok(false);
        }

        let stocked = tables.stock.keys().any(|(_, product_id)| *product_id == id);
        let priced = tables
            .price_lists
            .iter()
            .any(|l| l.items.iter().any(|i| i.product_id == id));
        if stocked || priced {
            return Err(AppError::conflict(
                "Product is referenced by stock levels or price lists",
                json!({"id": id, "stock": stocked, "price_lists": priced}),
            ));
        }

        tables.products.retain(|p| p.id != id);
        Ok(true)
    }
}
