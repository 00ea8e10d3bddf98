//! Repository trait for addresses.

use crate::domain::entities::{Address, AddressPatch, NewAddress};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AddressFilter {
    pub tenant_id: Uuid,
    pub search: Option<String>,
}

impl AddressFilter {
    pub fn matches(&self, a: &Address) -> bool {
        a.tenant_id == self.tenant_id
            && self.search.as_deref().is_none_or(|s| {
                let s = s.to_lowercase();
                a.label.to_lowercase().contains(&s) || a.city.to_lowercase().contains(&s)
            })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create(&self, new_address: NewAddress) -> Result<Address, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError>;

    /// Lists addresses ordered by label.
    async fn list(&self, filter: AddressFilter, page: PageRequest)
    -> Result<Page<Address>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the address does not exist.
    async fn update(&self, id: Uuid, patch: AddressPatch) -> Result<Address, AppError>;

    /// Deletes an address; references from events and warehouses are cleared.
    /// Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
