//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - In-memory implementations live in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! Tenant-scoped list operations take a filter struct carrying the tenant id;
//! each filter also exposes `matches`, the in-memory form of its SQL predicate.

use std::sync::Arc;

pub mod address_repository;
pub mod branding_repository;
pub mod client_log_repository;
pub mod document_repository;
pub mod event_repository;
pub mod price_list_repository;
pub mod product_repository;
pub mod team_repository;
pub mod tenant_repository;
pub mod token_repository;
pub mod user_repository;
pub mod warehouse_repository;

pub use address_repository::{AddressFilter, AddressRepository};
pub use branding_repository::BrandingRepository;
pub use client_log_repository::{ClientLogFilter, ClientLogRepository};
pub use document_repository::{DocumentFilter, DocumentRepository};
pub use event_repository::{EventFilter, EventRepository};
pub use price_list_repository::{PriceListFilter, PriceListRepository};
pub use product_repository::{ProductFilter, ProductRepository};
pub use team_repository::{TeamFilter, TeamRepository};
pub use tenant_repository::TenantRepository;
pub use token_repository::{ApiToken, TokenRepository};
pub use user_repository::{UserFilter, UserRepository};
pub use warehouse_repository::{WarehouseFilter, WarehouseRepository};

#[cfg(test)]
pub use address_repository::MockAddressRepository;
#[cfg(test)]
pub use branding_repository::MockBrandingRepository;
#[cfg(test)]
pub use client_log_repository::MockClientLogRepository;
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use price_list_repository::MockPriceListRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use team_repository::MockTeamRepository;
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use warehouse_repository::MockWarehouseRepository;

/// One handle per repository, all backed by the same storage.
///
/// Built by [`crate::infrastructure::persistence::pg_repositories`] or
/// [`crate::infrastructure::memory::memory_repositories`].
#[derive(Clone)]
pub struct Repositories {
    pub tenants: Arc<dyn TenantRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub events: Arc<dyn EventRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub warehouses: Arc<dyn WarehouseRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub price_lists: Arc<dyn PriceListRepository>,
    pub branding: Arc<dyn BrandingRepository>,
    pub client_logs: Arc<dyn ClientLogRepository>,
}
