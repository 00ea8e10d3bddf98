use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate};
use crate::domain::entities::{NewPriceList, PriceList, PriceListItem, PriceListPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{PriceListFilter, PriceListRepository};
use crate::error::AppError;

#[async_trait]
impl PriceListRepository for MemoryStore {
    async fn create(&self, new_list: NewPriceList) -> Result<PriceList, AppError> {
        let now = Utc::now();
        let list = PriceList {
            id: Uuid::new_v4(),
            tenant_id: new_list.tenant_id,
            name: new_list.name,
            currency: new_list.currency,
            valid_from: new_list.valid_from,
            valid_to: new_list.valid_to,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.price_lists.push(list.clone());
        Ok(list)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceList>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.price_lists.iter().find(|l| l.id == id).cloned())
    }

    async fn list(
        &self,
        filter: PriceListFilter,
        page: PageRequest,
    ) -> Result<Page<PriceList>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.price_lists,
            |l| filter.matches(l),
            |a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: PriceListPatch) -> Result<PriceList, AppError> {
        let mut tables = self.tables.write().await;
        let list = tables
            .price_lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| missing("Price list", id))?;
        list.apply(patch, Utc::now());
        Ok(list.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.price_lists.len();
        tables.price_lists.retain(|l| l.id != id);
        Ok(tables.price_lists.len() != before)
    }

    async fn upsert_item(
        &self,
        price_list_id: Uuid,
        item: PriceListItem,
    ) -> Result<PriceListItem, AppError> {
        let mut tables = self.tables.write().await;
        let list = tables
            .price_lists
            .iter_mut()
            .find(|l| l.id == price_list_id)
            .ok_or_else(|| missing("Price list", price_list_id))?;

        match list
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => existing.unit_price = item.unit_price,
            None => list.items.push(item.clone()),
        }
        list.updated_at = Utc::now();
        Ok(item)
    }

    async fn remove_item(&self, price_list_id: Uuid, product_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(list) = tables
            .price_lists
            .iter_mut()
            .find(|l| l.id == price_list_id)
        else {
            return Ok(false);
        };

        let before = list.items.len();
        list.items.retain(|i| i.product_id != product_id);
        Ok(list.items.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewProduct;
    use crate::domain::repositories::ProductRepository;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_priced_product_cannot_be_deleted() {
        let store = MemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let product = ProductRepository::create(
            &store,
            NewProduct {
                tenant_id,
                sku: "TSHIRT-M".to_string(),
                name: "T-Shirt".to_string(),
                description: None,
                unit: "pcs".to_string(),
            },
        )
        .await
        .unwrap();
        let list = PriceListRepository::create(
            &store,
            NewPriceList {
                tenant_id,
                name: "Retail".to_string(),
                currency: "EUR".to_string(),
                valid_from: Utc::now(),
                valid_to: None,
            },
        )
        .await
        .unwrap();

        for price in [1999, 2499] {
            store
                .upsert_item(
                    list.id,
                    PriceListItem {
                        product_id: product.id,
                        unit_price: Decimal::new(price, 2),
                    },
                )
                .await
                .unwrap();
        }
        let list = PriceListRepository::find_by_id(&store, list.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].unit_price, Decimal::new(2499, 2));

        let err = ProductRepository::delete(&store, product.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        assert!(store.remove_item(list.id, product.id).await.unwrap());
        assert!(ProductRepository::delete(&store, product.id).await.unwrap());
    }
}
