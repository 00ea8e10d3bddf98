//! Repository trait for warehouses and stock levels.

use crate::domain::entities::{NewWarehouse, StockAdjustment, StockLevel, Warehouse, WarehousePatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct WarehouseFilter {
    pub tenant_id: Uuid,
    pub is_active: Option<bool>,
}

impl WarehouseFilter {
    pub fn matches(&self, w: &Warehouse) -> bool {
        w.tenant_id == self.tenant_id && self.is_active.is_none_or(|a| w.is_active == a)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn create(&self, new_warehouse: NewWarehouse) -> Result<Warehouse, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, AppError>;

    /// Lists warehouses ordered by name.
    async fn list(
        &self,
        filter: WarehouseFilter,
        page: PageRequest,
    ) -> Result<Page<Warehouse>, AppError>;

    async fn update(&self, id: Uuid, patch: WarehousePatch) -> Result<Warehouse, AppError>;

    /// Deletes a warehouse together with its stock levels.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Lists stock levels of a warehouse.
    async fn list_stock(
        &self,
        warehouse_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<StockLevel>, AppError>;

    /// Atomically applies `adjustment` and returns the new level.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the quantity would become negative.
    async fn adjust_stock(&self, adjustment: StockAdjustment) -> Result<StockLevel, AppError>;
}
