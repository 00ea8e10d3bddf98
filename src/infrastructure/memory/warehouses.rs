use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate};
use crate::domain::entities::{NewWarehouse, StockAdjustment, StockLevel, Warehouse, WarehousePatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{WarehouseFilter, WarehouseRepository};
use crate::error::AppError;

#[async_trait]
impl WarehouseRepository for MemoryStore {
    async fn create(&self, new_warehouse: NewWarehouse) -> Result<Warehouse, AppError> {
        let now = Utc::now();
        let warehouse = Warehouse {
            id: Uuid::new_v4(),
            tenant_id: new_warehouse.tenant_id,
            name: new_warehouse.name,
            address_id: new_warehouse.address_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.warehouses.push(warehouse.clone());
        Ok(warehouse)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.warehouses.iter().find(|w| w.id == id).cloned())
    }

    async fn list(
        &self,
        filter: WarehouseFilter,
        page: PageRequest,
    ) -> Result<Page<Warehouse>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.warehouses,
            |w| filter.matches(w),
            |a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: WarehousePatch) -> Result<Warehouse, AppError> {
        let mut tables = self.tables.write().await;
        let warehouse = tables
            .warehouses
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| missing("Warehouse", id))?;
        warehouse.apply(patch, Utc::now());
        Ok(warehouse.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.warehouses.len();
        tables.warehouses.retain(|w| w.id != id);
        if tables.warehouses.len() == before {
            return Ok(false);
        }
        tables.stock.retain(|(warehouse_id, _), _| *warehouse_id != id);
        Ok(true)
    }

    async fn list_stock(
        &self,
        warehouse_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<StockLevel>, AppError> {
        let tables = self.tables.read().await;
        let levels: Vec<StockLevel> = tables
            .stock
            .values()
            .filter(|s| s.warehouse_id == warehouse_id)
            .cloned()
            .collect();
        Ok(paginate(
            &levels,
            |_| true,
            |a, b| a.product_id.cmp(&b.product_id),
            page,
        ))
    }

    async fn adjust_stock(&self, adjustment: StockAdjustment) -> Result<StockLevel, AppError> {
        let key = (adjustment.warehouse_id, adjustment.product_id);
        let mut tables = self.tables.write().await;
        let current = tables.stock.get(&key).map(|s| s.quantity).unwrap_or(0);

        let quantity = adjustment.resulting_quantity(current).ok_or_else(|| {
            let message = if current.checked_add(adjustment.delta).is_none() {
                "Stock level out of range"
            } else {
                "Stock level cannot become negative"
            };
            AppError::conflict(
                message,
                json!({"current": current, "delta": adjustment.delta}),
            )
        })?;

        let level = StockLevel {
            warehouse_id: adjustment.warehouse_id,
            product_id: adjustment.product_id,
            quantity,
            updated_at: Utc::now(),
        };
        tables.stock.insert(key, level.clone());
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjustment(warehouse_id: Uuid, product_id: Uuid, delta: i64) -> StockAdjustment {
        StockAdjustment {
            warehouse_id,
            product_id,
            delta,
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_adjustments_accumulate_and_never_go_negative() {
        let store = MemoryStore::new();
        let (warehouse, product) = (Uuid::new_v4(), Uuid::new_v4());

        let level = store
            .adjust_stock(adjustment(warehouse, product, 10))
            .await
            .unwrap();
        assert_eq!(level.quantity, 10);

        let level = store
            .adjust_stock(adjustment(warehouse, product, -4))
            .await
            .unwrap();
        assert_eq!(level.quantity, 6);

        let err = store
            .adjust_stock(adjustment(warehouse, product, -7))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let err = store
            .adjust_stock(adjustment(warehouse, product, i64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict { message, .. } if message == "Stock level out of range"
        ));

        let page = store
            .list_stock(warehouse, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].quantity, 6);
    }
}
