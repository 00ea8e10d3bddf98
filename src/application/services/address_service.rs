//! Address management service.

use crate::domain::entities::{Address, AddressPatch, NewAddress, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{AddressFilter, AddressRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Input for creating an address in the active tenant.
#[derive(Debug, Clone)]
pub struct CreateAddress {
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

pub struct AddressService {
    repository: Arc<dyn AddressRepository>,
}

impl AddressService {
    pub fn new(repository: Arc<dyn AddressRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_addresses(
        &self,
        ctx: &TenantContext,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Address>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(AddressFilter { tenant_id, search }, page)
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without tenant context or below Manager.
    pub async fn create_address(
        &self,
        ctx: &TenantContext,
        input: CreateAddress,
    ) -> Result<Address, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;

        self.repository
            .create(NewAddress {
                tenant_id,
                label: input.label,
                line1: input.line1,
                line2: input.line2,
                city: input.city,
                postal_code: input.postal_code,
                country: input.country.to_uppercase(),
            })
            .await
    }

    pub async fn get_address(&self, ctx: &TenantContext, id: Uuid) -> Result<Address, AppError> {
        let address = self.find(id).await?;
        ctx.ensure_access(address.tenant_id)?;
        Ok(address)
    }

    pub async fn update_address(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        mut patch: AddressPatch,
    ) -> Result<Address, AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_address(ctx, id).await?;

        patch.country = patch.country.map(|c| c.to_uppercase());
        self.repository.update(id, patch).await
    }

    /// Deletes an address. Events and warehouses pointing at it lose the reference.
    pub async fn delete_address(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_address(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Checks that an address referenced by another entity exists in `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] otherwise.
    pub async fn ensure_reference(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        match self.repository.find_by_id(id).await? {
            Some(a) if a.tenant_id == tenant_id => Ok(()),
            _ => Err(AppError::bad_request(
                "Referenced address does not exist in this tenant",
                json!({"address_id": id}),
            )),
        }
    }

    async fn find(&self, id: Uuid) -> Result<Address, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Address not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockAddressRepository;
    use chrono::Utc;

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn address(id: Uuid, tenant_id: Uuid) -> Address {
        Address {
            id,
            tenant_id,
            label: "HQ".to_string(),
            line1: "Main St 1".to_string(),
            line2: None,
            city: "Berlin".to_string(),
            postal_code: "10115".to_string(),
            country: "DE".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_address_uppercases_country() {
        let tenant = Uuid::new_v4();
        let mut repo = MockAddressRepository::new();
        repo.expect_create()
            .withf(|a| a.country == "DE")
            .times(1)
            .returning(|a| Ok(address(Uuid::new_v4(), a.tenant_id)));

        let result = AddressService::new(Arc::new(repo))
            .create_address(
                &ctx(Role::Manager, tenant),
                CreateAddress {
                    label: "HQ".to_string(),
                    line1: "Main St 1".to_string(),
                    line2: None,
                    city: "Berlin".to_string(),
                    postal_code: "10115".to_string(),
                    country: "de".to_string(),
                },
            )
            .await;

        assert_eq!(result.unwrap().tenant_id, tenant);
    }

    #[tokio::test]
    async fn test_staff_cannot_delete() {
        let result = AddressService::new(Arc::new(MockAddressRepository::new()))
            .delete_address(&ctx(Role::Staff, Uuid::new_v4()), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_reference_from_other_tenant_is_bad_request() {
        let mut repo = MockAddressRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(address(id, Uuid::new_v4()))));

        let result = AddressService::new(Arc::new(repo))
            .ensure_reference(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }
}
