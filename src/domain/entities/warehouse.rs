//! Warehouse entity and per-product stock levels.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Warehouse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub address_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Warehouse {
    pub fn apply(&mut self, patch: WarehousePatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.address_id {
            self.address_id = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub tenant_id: Uuid,
    pub name: String,
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub address_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

/// Quantity of one product held in one warehouse. Never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLevel {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// A signed change applied to a stock level.
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub delta: i64,
    pub reason: Option<String>,
}

impl StockAdjustment {
    /// Quantity after applying this adjustment to `current`, or `None` if it
    /// would go negative or overflow.
    pub fn resulting_quantity(&self, current: i64) -> Option<i64> {
        current.checked_add(self.delta).filter(|q| *q >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjustment(delta: i64) -> StockAdjustment {
        StockAdjustment {
            warehouse_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            delta,
            reason: None,
        }
    }

    #[test]
    fn test_resulting_quantity() {
        assert_eq!(adjustment(5).resulting_quantity(0), Some(5));
        assert_eq!(adjustment(-5).resulting_quantity(5), Some(0));
        assert_eq!(adjustment(-6).resulting_quantity(5), None);
        assert_eq!(adjustment(1).resulting_quantity(i64::MAX), None);
    }
}
