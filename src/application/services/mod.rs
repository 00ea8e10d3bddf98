//! Business logic services for the application layer.

pub mod address_service;
pub mod auth_service;
pub mod branding_service;
pub mod client_log_service;
pub mod document_service;
pub mod event_service;
pub mod price_list_service;
pub mod product_service;
pub mod team_service;
pub mod tenant_service;
pub mod user_service;
pub mod warehouse_service;

pub use address_service::AddressService;
pub use auth_service::AuthService;
pub use branding_service::BrandingService;
pub use client_log_service::ClientLogService;
pub use document_service::DocumentService;
pub use event_service::EventService;
pub use price_list_service::PriceListService;
pub use product_service::ProductService;
pub use team_service::TeamService;
pub use tenant_service::TenantService;
pub use user_service::UserService;
pub use warehouse_service::WarehouseService;
