//! Repository trait for price lists and their items.

use crate::domain::entities::{NewPriceList, PriceList, PriceListItem, PriceListPatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PriceListFilter {
    pub tenant_id: Uuid,
    pub currency: Option<String>,
}

impl PriceListFilter {
    pub fn matches(&self, p: &PriceList) -> bool {
        p.tenant_id == self.tenant_id
            && self
                .currency
                .as_deref()
                .is_none_or(|c| p.currency.eq_ignore_ascii_case(c))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceListRepository: Send + Sync {
    async fn create(&self, new_list: NewPriceList) -> Result<PriceList, AppError>;

    /// Loads a price list with its items ordered by product id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceList>, AppError>;

    /// Lists price lists (with items) ordered by name.
    async fn list(
        &self,
        filter: PriceListFilter,
        page: PageRequest,
    ) -> Result<Page<PriceList>, AppError>;

    async fn update(&self, id: Uuid, patch: PriceListPatch) -> Result<PriceList, AppError>;

    /// Deletes a price list and its items.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Inserts or replaces the price of one product.
    async fn upsert_item(
        &self,
        price_list_id: Uuid,
        item: PriceListItem,
    ) -> Result<PriceListItem, AppError>;

    /// Removes the price of one product. Returns `false` if it was not priced.
    async fn remove_item(&self, price_list_id: Uuid, product_id: Uuid) -> Result<bool, AppError>;
}
