//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries against the schema in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgTenantRepository`], [`PgUserRepository`], [`PgTokenRepository`] - Identity
//! - [`PgAddressRepository`], [`PgEventRepository`], [`PgTeamRepository`] - Scheduling
//! - [`PgProductRepository`], [`PgWarehouseRepository`], [`PgPriceListRepository`] - Inventory and sales
//! - [`PgDocumentRepository`] - Document metadata
//! - [`PgBrandingRepository`] - Tenant branding
//! - [`PgClientLogRepository`] - Client log batches

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::repositories::Repositories;

pub mod pg_address_repository;
pub mod pg_branding_repository;
pub mod pg_client_log_repository;
pub mod pg_document_repository;
pub mod pg_event_repository;
pub mod pg_price_list_repository;
pub mod pg_product_repository;
pub mod pg_team_repository;
pub mod pg_tenant_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;
pub mod pg_warehouse_repository;

pub use pg_address_repository::PgAddressRepository;
pub use pg_branding_repository::PgBrandingRepository;
pub use pg_client_log_repository::PgClientLogRepository;
pub use pg_document_repository::PgDocumentRepository;
pub use pg_event_repository::PgEventRepository;
pub use pg_price_list_repository::PgPriceListRepository;
pub use pg_product_repository::PgProductRepository;
pub use pg_team_repository::PgTeamRepository;
pub use pg_tenant_repository::PgTenantRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
pub use pg_warehouse_repository::PgWarehouseRepository;

/// Builds a [`Repositories`] set sharing one connection pool.
pub fn pg_repositories(pool: Arc<PgPool>) -> Repositories {
    Repositories {
        tenants: Arc::new(PgTenantRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool.clone())),
        tokens: Arc::new(PgTokenRepository::new(pool.clone())),
        addresses: Arc::new(PgAddressRepository::new(pool.clone())),
        events: Arc::new(PgEventRepository::new(pool.clone())),
        teams: Arc::new(PgTeamRepository::new(pool.clone())),
        products: Arc::new(PgProductRepository::new(pool.clone())),
        warehouses: Arc::new(PgWarehouseRepository::new(pool.clone())),
        documents: Arc::new(PgDocumentRepository::new(pool.clone())),
        price_lists: Arc::new(PgPriceListRepository::new(pool.clone())),
        branding: Arc::new(PgBrandingRepository::new(pool.clone())),
        client_logs: Arc::new(PgClientLogRepository::new(pool)),
    }
}
