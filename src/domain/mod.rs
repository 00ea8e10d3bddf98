//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the per-request tenant context
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`tenant_context`] - Active tenant, role and impersonation state of a request
//! - [`page`] - Offset pagination primitives shared by repositories
//! - [`log_worker`] - Asynchronous client log processing worker
//!
//! # Client Log Flow
//!
//! 1. `POST /api/logs` validates entries and pushes them to a bounded channel
//! 2. [`log_worker::run_log_worker`] drains the channel in batches
//! 3. Each entry is emitted through `tracing`, then the batch is persisted via
//!    [`repositories::ClientLogRepository`] with retry

pub mod entities;
pub mod log_worker;
pub mod page;
pub mod repositories;
pub mod tenant_context;
