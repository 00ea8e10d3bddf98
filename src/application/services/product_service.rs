//! Product catalog service.

use crate::domain::entities::{NewProduct, Product, ProductPatch, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ProductFilter, ProductRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
}

/// Service for products. SKUs are unique per tenant.
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_products(
        &self,
        ctx: &TenantContext,
        search: Option<String>,
        is_active: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Product>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(
                ProductFilter {
                    tenant_id,
                    search,
                    is_active,
                },
                page,
            )
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the SKU already exists in the tenant.
    pub async fn create_product(
        &self,
        ctx: &TenantContext,
        input: CreateProduct,
    ) -> Result<Product, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;
        self.ensure_sku_free(tenant_id, &input.sku, None).await?;

        self.repository
            .create(NewProduct {
                tenant_id,
                sku: input.sku,
                name: input.name,
                description: input.description,
                unit: input.unit,
            })
            .await
    }

    pub async fn get_product(&self, ctx: &TenantContext, id: Uuid) -> Result<Product, AppError> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(product.tenant_id)?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Product, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_product(ctx, id).await?;
        if let Some(sku) = &patch.sku {
            self.ensure_sku_free(current.tenant_id, sku, Some(id)).await?;
        }
        self.repository.update(id, patch).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] while stock levels or price-list items
    /// reference the product.
    pub async fn delete_product(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_product(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Checks that a product referenced by another entity exists in `tenant_id`.
    pub async fn ensure_reference(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        match self.repository.find_by_id(id).await? {
            Some(p) if p.tenant_id == tenant_id => Ok(()),
            _ => Err(AppError::bad_request(
                "Referenced product does not exist in this tenant",
                json!({"product_id": id}),
            )),
        }
    }

    async fn ensure_sku_free(
        &self,
        tenant_id: Uuid,
        sku: &str,
        except: Option<Uuid>,
    ) -> Result<(), AppError> {
        match self.repository.find_by_sku(tenant_id, sku).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::conflict(
                "Product SKU already exists",
                json!({"sku": sku}),
            )),
            _ => Ok(()),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Product not found", json!({"id": id}))
}
