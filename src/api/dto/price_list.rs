//! DTOs for price lists and their items.

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::price_list_service::CreatePriceList;
use crate::domain::entities::{PriceList, PriceListItem, PriceListPatch};

/// ISO 4217 code; normalized to upper-case by the service.
static CURRENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePriceListRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(regex(path = "*CURRENCY_REGEX", message = "Currency must be a 3-letter ISO 4217 code"))]
    pub currency: String,

    pub valid_from: Option<DateTime<Utc>>,

    pub valid_to: Option<DateTime<Utc>>,
}

impl From<CreatePriceListRequest> for CreatePriceList {
    fn from(req: CreatePriceListRequest) -> Self {
        CreatePriceList {
            name: req.name,
            currency: req.currency,
            valid_from: req.valid_from,
            valid_to: req.valid_to,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePriceListRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(regex(path = "*CURRENCY_REGEX", message = "Currency must be a 3-letter ISO 4217 code"))]
    pub currency: Option<String>,

    pub valid_from: Option<DateTime<Utc>>,

    /// Absent = no change, null = open-ended.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub valid_to: Option<Option<DateTime<Utc>>>,
}

impl From<UpdatePriceListRequest> for PriceListPatch {
    fn from(req: UpdatePriceListRequest) -> Self {
        PriceListPatch {
            name: req.name,
            currency: req.currency,
            valid_from: req.valid_from,
            valid_to: req.valid_to,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceListFilterParams {
    pub currency: Option<String>,
}

/// Request body for `PUT /api/price-lists/{id}/items/{product_id}`.
///
/// Accepts the price as a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct SetItemPriceRequest {
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PriceListItemResponse {
    pub product_id: Uuid,
    pub unit_price: Decimal,
}

impl From<PriceListItem> for PriceListItemResponse {
    fn from(i: PriceListItem) -> Self {
        Self {
            product_id: i.product_id,
            unit_price: i.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PriceListResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub items: Vec<PriceListItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PriceList> for PriceListResponse {
    fn from(l: PriceList) -> Self {
        Self {
            id: l.id,
            tenant_id: l.tenant_id,
            name: l.name,
            currency: l.currency,
            valid_from: l.valid_from,
            valid_to: l.valid_to,
            items: l.items.into_iter().map(PriceListItemResponse::from).collect(),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}
