//! In-memory repository implementations.
//!
//! Used by the integration tests and for local development without a
//! database (`STORAGE_BACKEND=memory`). Uniqueness, reference clearing and
//! the non-negative stock rule behave like the PostgreSQL schema.

mod addresses;
mod branding;
mod client_logs;
mod documents;
mod events;
mod price_lists;
mod products;
mod store;
mod teams;
mod tenants;
mod tokens;
mod users;
mod warehouses;

pub use store::{MemoryStore, memory_repositories};
