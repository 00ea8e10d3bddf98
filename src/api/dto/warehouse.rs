//! DTOs for warehouses and stock levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::warehouse_service::CreateWarehouse;
use crate::domain::entities::{StockLevel, Warehouse, WarehousePatch};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub address_id: Option<Uuid>,
}

impl From<CreateWarehouseRequest> for CreateWarehouse {
    fn from(req: CreateWarehouseRequest) -> Self {
        CreateWarehouse {
            name: req.name,
            address_id: req.address_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address_id: Option<Option<Uuid>>,

    pub is_active: Option<bool>,
}

impl From<UpdateWarehouseRequest> for WarehousePatch {
    fn from(req: UpdateWarehouseRequest) -> Self {
        WarehousePatch {
            name: req.name,
            address_id: req.address_id,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WarehouseFilterParams {
    pub is_active: Option<bool>,
}

/// Request body for `POST /api/warehouses/{id}/stock/adjustments`.
///
/// `delta` is signed: positive for receipts, negative for withdrawals.
#[derive(Debug, Deserialize, Validate)]
pub struct StockAdjustmentRequest {
    pub product_id: Uuid,
    pub delta: i64,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub address_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Warehouse> for WarehouseResponse {
    fn from(w: Warehouse) -> Self {
        Self {
            id: w.id,
            tenant_id: w.tenant_id,
            name: w.name,
            address_id: w.address_id,
            is_active: w.is_active,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockLevelResponse {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<StockLevel> for StockLevelResponse {
    fn from(s: StockLevel) -> Self {
        Self {
            warehouse_id: s.warehouse_id,
            product_id: s.product_id,
            quantity: s.quantity,
            updated_at: s.updated_at,
        }
    }
}
