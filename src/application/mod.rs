//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! access checks against the [`crate::domain::tenant_context::TenantContext`],
//! and business rules. Services consume repository traits and provide a clean
//! API for HTTP handlers, which stay thin.
//!
//! # Available Services
//!
//! - [`services::AuthService`] - API token authentication and issuance
//! - [`services::TenantService`] - Tenant administration (super admins)
//! - [`services::UserService`] - Users and role grants within a tenant
//! - [`services::AddressService`], [`services::EventService`], [`services::TeamService`]
//! - [`services::ProductService`], [`services::WarehouseService`], [`services::PriceListService`]
//! - [`services::DocumentService`] - Document metadata
//! - [`services::BrandingService`] - Tenant branding with cached public lookup
//! - [`services::ClientLogService`] - Client log intake into the log queue

pub mod services;
