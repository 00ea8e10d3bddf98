use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate};
use crate::domain::entities::{Address, AddressPatch, NewAddress};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{AddressFilter, AddressRepository};
use crate::error::AppError;

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn create(&self, new_address: NewAddress) -> Result<Address, AppError> {
        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            tenant_id: new_address.tenant_id,
            label: new_address.label,
            line1: new_address.line1,
            line2: new_address.line2,
            city: new_address.city,
            postal_code: new_address.postal_code,
            country: new_address.country,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.addresses.push(address.clone());
        Ok(address)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.iter().find(|a| a.id == id).cloned())
    }

    async fn list(
        &self,
        filter: AddressFilter,
        page: PageRequest,
    ) -> Result<Page<Address>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.addresses,
            |a| filter.matches(a),
            |a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: AddressPatch) -> Result<Address, AppError> {
        let mut tables = self.tables.write().await;
        let address = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| missing("Address", id))?;
        address.apply(patch, Utc::now());
        Ok(address.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.addresses.len();
        tables.addresses.retain(|a| a.id != id);
        if tables.addresses.len() == before {
            return Ok(false);
        }

        for event in tables
            .events
            .iter_mut()
            .filter(|e| e.venue_address_id == Some(id))
        {
            event.venue_address_id = None;
        }
        for warehouse in tables
            .warehouses
            .iter_mut()
            .filter(|w| w.address_id == Some(id))
        {
            warehouse.address_id = None;
        }
        Ok(true)
    }
}
