//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AddressService, AuthService, BrandingService, ClientLogService, DocumentService, EventService,
    PriceListService, ProductService, TeamService, TenantService, UserService, WarehouseService,
};
use crate::domain::entities::NewClientLogEntry;
use crate::domain::repositories::Repositories;
use crate::infrastructure::cache::CacheService;

/// Services wired over one set of repositories.
///
/// Cloned per request by axum; every field is an `Arc` or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub tenant_service: Arc<TenantService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub address_service: Arc<AddressService>,
    pub event_service: Arc<EventService>,
    pub team_service: Arc<TeamService>,
    pub product_service: Arc<ProductService>,
    pub warehouse_service: Arc<WarehouseService>,
    pub document_service: Arc<DocumentService>,
    pub price_list_service: Arc<PriceListService>,
    pub branding_service: Arc<BrandingService>,
    pub client_log_service: Arc<ClientLogService>,
    pub cache: Arc<dyn CacheService>,
    /// Include `details` of internal errors in problem responses.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        cache: Arc<dyn CacheService>,
        log_sender: mpsc::Sender<NewClientLogEntry>,
        signing_secret: String,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            repos.tokens.clone(),
            repos.users.clone(),
            repos.tenants.clone(),
            signing_secret,
        ));
        let address_service = Arc::new(AddressService::new(repos.addresses.clone()));
        let product_service = Arc::new(ProductService::new(repos.products.clone()));
        let event_service = Arc::new(EventService::new(
            repos.events.clone(),
            address_service.clone(),
        ));

        Self {
            tenant_service: Arc::new(TenantService::new(repos.tenants.clone(), cache.clone())),
            user_service: Arc::new(UserService::new(repos.users.clone(), auth_service.clone())),
            team_service: Arc::new(TeamService::new(
                repos.teams.clone(),
                repos.users.clone(),
                event_service.clone(),
            )),
            warehouse_service: Arc::new(WarehouseService::new(
                repos.warehouses.clone(),
                address_service.clone(),
                product_service.clone(),
            )),
            document_service: Arc::new(DocumentService::new(
                repos.documents.clone(),
                event_service.clone(),
            )),
            price_list_service: Arc::new(PriceListService::new(
                repos.price_lists.clone(),
                product_service.clone(),
            )),
            branding_service: Arc::new(BrandingService::new(
                repos.branding.clone(),
                repos.tenants.clone(),
                cache.clone(),
            )),
            client_log_service: Arc::new(ClientLogService::new(repos.client_logs, log_sender)),
            auth_service,
            address_service,
            event_service,
            product_service,
            cache,
            expose_error_details: false,
        }
    }

    pub fn expose_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}
