//! # EventDesk
//!
//! A multi-tenant backend for event scheduling, inventory and sales documents,
//! built with Axum and PostgreSQL.
//!
//! ## Architecture
//!
//! The crate is split into layers:
//!
//! - **Domain Layer** ([`domain`]) - Entities, tenant context, paging and repository traits
//! - **Application Layer** ([`application`]) - Business rules and authorization per resource
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL, in-memory storage and Redis cache
//! - **API Layer** ([`api`]) - REST handlers, DTOs, extractors and middleware
//!
//! ## Features
//!
//! - Tenant isolation with super admin impersonation via `X-Tenant-Id`
//! - Role-capped pagination echoed in `X-*` headers
//! - RFC 7807 problem responses carrying a correlation id
//! - Buffered client log ingestion with a background writer
//! - Cached public branding, API token authentication and rate limiting
//!
//! ## Quick Start
//!
//! ```bash
//! export TOKEN_SIGNING_SECRET="change-me"
//! export STORAGE_BACKEND=memory   # or DATABASE_URL=postgres://...
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, TenantService, UserService};
    pub use crate::domain::entities::{NewTenant, Role, Tenant, User};
    pub use crate::domain::repositories::Repositories;
    pub use crate::domain::tenant_context::TenantContext;
    pub use crate::error::AppError;
    pub use crate::infrastructure::memory::memory_repositories;
    pub use crate::routes::{app_router, unthrottled_router};
    pub use crate::state::AppState;
}
