//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Request DTOs convert into service inputs or entity
//! patches; response DTOs are built from entities.

pub mod address;
pub mod branding;
pub mod client_log;
pub mod document;
pub mod event;
pub mod health;
pub mod pagination;
pub mod price_list;
pub mod product;
pub mod team;
pub mod tenant;
pub mod user;
pub mod warehouse;
