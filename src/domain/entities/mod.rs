//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; access rules live in
//! [`crate::domain::tenant_context`] and business rules in the services.
//!
//! # Design Pattern
//!
//! Entities are split between read models and inputs:
//! - `NewX` - For creating new records
//! - `XPatch` - For partial updates (`Option<Option<T>>` clears nullable fields)

pub mod address;
pub mod branding;
pub mod client_log;
pub mod document;
pub mod event;
pub mod price_list;
pub mod product;
pub mod team;
pub mod tenant;
pub mod user;
pub mod warehouse;

pub use address::{Address, AddressPatch, NewAddress};
pub use branding::{Branding, BrandingUpdate};
pub use client_log::{ClientLogEntry, LogLevel, NewClientLogEntry};
pub use document::{Document, DocumentKind, DocumentPatch, NewDocument};
pub use event::{Event, EventPatch, EventStatus, NewEvent};
pub use price_list::{NewPriceList, PriceList, PriceListItem, PriceListPatch};
pub use product::{NewProduct, Product, ProductPatch};
pub use team::{NewTeam, Team, TeamPatch};
pub use tenant::{NewTenant, Tenant, TenantPatch};
pub use user::{NewUser, Role, User, UserPatch};
pub use warehouse::{NewWarehouse, StockAdjustment, StockLevel, Warehouse, WarehousePatch};

/// Error returned when parsing a textual enum value fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
