//! DTOs for addresses.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::address_service::CreateAddress;
use crate::domain::entities::{Address, AddressPatch};
use crate::error::AppError;

const MAX_LINE_LEN: u64 = 200;

/// ISO 3166-1 alpha-2; stored upper-case.
static COUNTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[validate(length(min = 1, max = 100))]
    pub label: String,
    #[validate(length(min = 1, max = 200))]
    pub line1: String,
    #[validate(length(max = MAX_LINE_LEN))]
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    #[validate(regex(path = "*COUNTRY_REGEX", message = "Country must be an ISO 3166-1 alpha-2 code"))]
    pub country: String,
}

impl From<CreateAddressRequest> for CreateAddress {
    fn from(req: CreateAddressRequest) -> Self {
        CreateAddress {
            label: req.label,
            line1: req.line1,
            line2: req.line2,
            city: req.city,
            postal_code: req.postal_code,
            country: req.country,
        }
    }
}

/// Request body for `PATCH /api/addresses/{id}`.
///
/// `line2` distinguishes absent (unchanged) from `null` (cleared).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(min = 1, max = 100))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub line1: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub line2: Option<Option<String>>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: Option<String>,
    #[validate(regex(path = "*COUNTRY_REGEX", message = "Country must be an ISO 3166-1 alpha-2 code"))]
    pub country: Option<String>,
}

impl UpdateAddressRequest {
    /// Field checks the derive cannot express on nullable fields.
    pub fn validate_nullable(&self) -> Result<(), AppError> {
        if let Some(Some(line2)) = &self.line2
            && line2.chars().count() as u64 > MAX_LINE_LEN
        {
            return Err(AppError::validation(
                "line2",
                "Address line must be at most 200 characters",
            ));
        }
        Ok(())
    }
}

impl From<UpdateAddressRequest> for AddressPatch {
    fn from(req: UpdateAddressRequest) -> Self {
        AddressPatch {
            label: req.label,
            line1: req.line1,
            line2: req.line2,
            city: req.city,
            postal_code: req.postal_code,
            country: req.country,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressSearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            tenant_id: a.tenant_id,
            label: a.label,
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            postal_code: a.postal_code,
            country: a.country,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}
