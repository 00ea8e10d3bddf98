//! Shared in-memory tables.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    Address, Branding, ClientLogEntry, Document, Event, PriceList, Product, StockLevel, Team,
    Tenant, User, Warehouse,
};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ApiToken, Repositories};
use crate::error::AppError;

#[derive(Default)]
pub(super) struct Tables {
    pub tenants: Vec<Tenant>,
    pub users: Vec<User>,
    pub tokens: Vec<ApiToken>,
    pub addresses: Vec<Address>,
    pub events: Vec<Event>,
    pub teams: Vec<Team>,
    pub products: Vec<Product>,
    pub warehouses: Vec<Warehouse>,
    /// Keyed by (warehouse_id, product_id).
    pub stock: HashMap<(Uuid, Uuid), StockLevel>,
    pub documents: Vec<Document>,
    pub price_lists: Vec<PriceList>,
    pub branding: HashMap<Uuid, Branding>,
    pub client_logs: Vec<ClientLogEntry>,
}

/// Storage backend keeping every table in process memory.
///
/// All repository traits are implemented on this one type so that reference
/// checks and cascades can see every table under a single lock. Each write
/// operation takes the write lock exactly once, which makes it atomic.
#[derive(Default)]
pub struct MemoryStore {
    pub(super) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds a [`Repositories`] set sharing one fresh [`MemoryStore`].
pub fn memory_repositories() -> Repositories {
    let store = Arc::new(MemoryStore::new());
    Repositories {
        tenants: store.clone(),
        users: store.clone(),
        tokens: store.clone(),
        addresses: store.clone(),
        events: store.clone(),
        teams: store.clone(),
        products: store.clone(),
        warehouses: store.clone(),
        documents: store.clone(),
        price_lists: store.clone(),
        branding: store.clone(),
        client_logs: store,
    }
}

/// Filters, sorts and slices a table into one page.
pub(super) fn paginate<T: Clone>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    order: impl FnMut(&T, &T) -> std::cmp::Ordering,
    page: PageRequest,
) -> Page<T> {
    let mut matching: Vec<T> = rows.iter().filter(|r| keep(r)).cloned().collect();
    matching.sort_by(order);
    let total = matching.len() as i64;
    Page::new(page.slice(&matching), total)
}

/// Same shape as the error produced for a Postgres unique violation.
pub(super) fn unique_violation(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": constraint }),
    )
}

pub(super) fn missing(entity: &str, id: Uuid) -> AppError {
    AppError::not_found(format!("{entity} not found"), json!({ "id": id }))
}
