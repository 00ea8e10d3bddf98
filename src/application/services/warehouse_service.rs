//! Warehouse and stock level service.

use crate::application::services::address_service::AddressService;
use crate::application::services::product_service::ProductService;
use crate::domain::entities::{
    NewWarehouse, Role, StockAdjustment, StockLevel, Warehouse, WarehousePatch,
};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{WarehouseFilter, WarehouseRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateWarehouse {
    pub name: String,
    pub address_id: Option<Uuid>,
}

/// Service for warehouses and their stock.
///
/// Stock adjustments are applied atomically by the repository; a change
/// that would make the quantity negative is rejected with 409.
pub struct WarehouseService {
    repository: Arc<dyn WarehouseRepository>,
    addresses: Arc<AddressService>,
    products: Arc<ProductService>,
}

impl WarehouseService {
    pub fn new(
        repository: Arc<dyn WarehouseRepository>,
        addresses: Arc<AddressService>,
        products: Arc<ProductService>,
    ) -> Self {
        Self {
            repository,
            addresses,
            products,
        }
    }

    pub async fn list_warehouses(
        &self,
        ctx: &TenantContext,
        is_active: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Warehouse>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(
                WarehouseFilter {
                    tenant_id,
                    is_active,
                },
                page,
            )
            .await
    }

    pub async fn create_warehouse(
        &self,
        ctx: &TenantContext,
        input: CreateWarehouse,
    ) -> Result<Warehouse, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;
        if let Some(address_id) = input.address_id {
            self.addresses.ensure_reference(tenant_id, address_id).await?;
        }

        self.repository
            .create(NewWarehouse {
                tenant_id,
                name: input.name,
                address_id: input.address_id,
            })
            .await
    }

    pub async fn get_warehouse(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Warehouse, AppError> {
        let warehouse = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(warehouse.tenant_id)?;
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: WarehousePatch,
    ) -> Result<Warehouse, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_warehouse(ctx, id).await?;
        if let Some(Some(address_id)) = patch.address_id {
            self.addresses
                .ensure_reference(current.tenant_id, address_id)
                .await?;
        }
        self.repository.update(id, patch).await
    }

    /// Deletes a warehouse together with its stock levels.
    pub async fn delete_warehouse(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_warehouse(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn list_stock(
        &self,
        ctx: &TenantContext,
        warehouse_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<StockLevel>, AppError> {
        self.get_warehouse(ctx, warehouse_id).await?;
        self.repository.list_stock(warehouse_id, page).await
    }

    /// Applies a signed quantity change to one product's stock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if the product is not in the tenant.
    /// Returns [`AppError::Conflict`] if the warehouse is inactive or the
    /// quantity would become negative.
    pub async fn adjust_stock(
        &self,
        ctx: &TenantContext,
        adjustment: StockAdjustment,
    ) -> Result<StockLevel, AppError> {
        ctx.require_role(Role::Manager)?;
        let warehouse = self.get_warehouse(ctx, adjustment.warehouse_id).await?;
        if !warehouse.is_active {
            return Err(AppError::conflict(
                "Warehouse is inactive",
                json!({"warehouse_id": warehouse.id}),
            ));
        }
        self.products
            .ensure_reference(warehouse.tenant_id, adjustment.product_id)
            .await?;

        let level = self.repository.adjust_stock(adjustment.clone()).await?;
        tracing::info!(
            warehouse_id = %adjustment.warehouse_id,
            product_id = %adjustment.product_id,
            delta = adjustment.delta,
            quantity = level.quantity,
            reason = adjustment.reason.as_deref().unwrap_or(""),
            "Stock adjusted"
        );
        Ok(level)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Warehouse not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Product;
    use crate::domain::repositories::{
        MockAddressRepository, MockProductRepository, MockWarehouseRepository,
    };
    use chrono::Utc;

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn warehouse(id: Uuid, tenant_id: Uuid, is_active: bool) -> Warehouse {
        Warehouse {
            id,
            tenant_id,
            name: "Main".to_string(),
            address_id: None,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: Uuid, tenant_id: Uuid) -> Product {
        Product {
            id,
            tenant_id,
            sku: "CH-1".to_string(),
            name: "Chair".to_string(),
            description: None,
            unit: "pcs".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockWarehouseRepository, products: MockProductRepository) -> WarehouseService {
        WarehouseService::new(
            Arc::new(repo),
            Arc::new(AddressService::new(Arc::new(MockAddressRepository::new()))),
            Arc::new(ProductService::new(Arc::new(products))),
        )
    }

    fn adjustment(delta: i64) -> StockAdjustment {
        StockAdjustment {
            warehouse_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            delta,
            reason: Some("delivery".to_string()),
        }
    }

    #[tokio::test]
    async fn test_adjust_stock_success() {
        let tenant = Uuid::new_v4();
        let mut repo = MockWarehouseRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(warehouse(id, tenant, true))));
        repo.expect_adjust_stock().times(1).returning(|a| {
            Ok(StockLevel {
                warehouse_id: a.warehouse_id,
                product_id: a.product_id,
                quantity: a.delta,
                updated_at: Utc::now(),
            })
        });
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(id, tenant))));

        let level = service(repo, products)
            .adjust_stock(&ctx(Role::Manager, tenant), adjustment(5))
            .await
            .unwrap();

        assert_eq!(level.quantity, 5);
    }

    #[tokio::test]
    async fn test_adjust_stock_with_foreign_product() {
        let tenant = Uuid::new_v4();
        let mut repo = MockWarehouseRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(warehouse(id, tenant, true))));
        repo.expect_adjust_stock().never();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id, Uuid::new_v4()))));

        let result = service(repo, products)
            .adjust_stock(&ctx(Role::Manager, tenant), adjustment(5))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_adjust_stock_in_inactive_warehouse() {
        let tenant = Uuid::new_v4();
        let mut repo = MockWarehouseRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(warehouse(id, tenant, false))));

        let result = service(repo, MockProductRepository::new())
            .adjust_stock(&ctx(Role::Manager, tenant), adjustment(1))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_staff_cannot_adjust_stock() {
        let result = service(MockWarehouseRepository::new(), MockProductRepository::new())
            .adjust_stock(&ctx(Role::Staff, Uuid::new_v4()), adjustment(1))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }
}
