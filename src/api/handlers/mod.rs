//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one resource. Handlers only translate
//! between DTOs and service calls; authorization and tenant scoping live in
//! the services.

pub mod addresses;
pub mod branding;
pub mod documents;
pub mod events;
pub mod health;
pub mod logs;
pub mod price_lists;
pub mod products;
pub mod teams;
pub mod tenants;
pub mod users;
pub mod warehouses;

pub use addresses::{
    create_address_handler, delete_address_handler, get_address_handler, list_addresses_handler,
    update_address_handler,
};
pub use branding::{get_branding_handler, public_branding_handler, update_branding_handler};
pub use documents::{
    create_document_handler, delete_document_handler, get_document_handler,
    list_documents_handler, update_document_handler,
};
pub use events::{
    create_event_handler, delete_event_handler, get_event_handler, list_events_handler,
    update_event_handler,
};
pub use health::health_handler;
pub use logs::{list_logs_handler, submit_logs_handler};
pub use price_lists::{
    create_price_list_handler, delete_price_list_handler, get_price_list_handler,
    list_price_list_items_handler, list_price_lists_handler, remove_price_list_item_handler,
    set_price_list_item_handler, update_price_list_handler,
};
pub use products::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    update_product_handler,
};
pub use teams::{
    add_team_member_handler, create_team_handler, delete_team_handler, get_team_handler,
    list_teams_handler, remove_team_member_handler, update_team_handler,
};
pub use tenants::{
    create_tenant_handler, current_tenant_handler, delete_tenant_handler, get_tenant_handler,
    list_tenants_handler, update_tenant_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler, me_handler,
    update_user_handler,
};
pub use warehouses::{
    adjust_stock_handler, create_warehouse_handler, delete_warehouse_handler,
    get_warehouse_handler, list_stock_handler, list_warehouses_handler, update_warehouse_handler,
};
