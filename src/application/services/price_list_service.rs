//! Price list service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::application::services::product_service::ProductService;
use crate::domain::entities::{NewPriceList, PriceList, PriceListItem, PriceListPatch, Role};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{PriceListFilter, PriceListRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePriceList {
    pub name: String,
    pub currency: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// Service for price lists and the product prices they contain.
pub struct PriceListService {
    repository: Arc<dyn PriceListRepository>,
    products: Arc<ProductService>,
}

impl PriceListService {
    pub fn new(repository: Arc<dyn PriceListRepository>, products: Arc<ProductService>) -> Self {
        Self {
            repository,
            products,
        }
    }

    pub async fn list_price_lists(
        &self,
        ctx: &TenantContext,
        currency: Option<String>,
        page: PageRequest,
    ) -> Result<Page<PriceList>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        self.repository
            .list(PriceListFilter { tenant_id, currency }, page)
            .await
    }

    /// Creates an empty price list; `valid_from` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `valid_to` precedes `valid_from`.
    pub async fn create_price_list(
        &self,
        ctx: &TenantContext,
        input: CreatePriceList,
    ) -> Result<PriceList, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;

        let valid_from = input.valid_from.unwrap_or_else(Utc::now);
        validate_validity(valid_from, input.valid_to)?;

        self.repository
            .create(NewPriceList {
                tenant_id,
                name: input.name,
                currency: input.currency.to_uppercase(),
                valid_from,
                valid_to: input.valid_to,
            })
            .await
    }

    pub async fn get_price_list(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<PriceList, AppError> {
        let list = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ctx.ensure_access(list.tenant_id)?;
        Ok(list)
    }

    pub async fn update_price_list(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        mut patch: PriceListPatch,
    ) -> Result<PriceList, AppError> {
        ctx.require_role(Role::Manager)?;
        let current = self.get_price_list(ctx, id).await?;

        validate_validity(
            patch.valid_from.unwrap_or(current.valid_from),
            patch.valid_to.unwrap_or(current.valid_to),
        )?;
        patch.currency = patch.currency.map(|c| c.to_uppercase());
        self.repository.update(id, patch).await
    }

    pub async fn delete_price_list(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_price_list(ctx, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn list_items(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> Result<Vec<PriceListItem>, AppError> {
        Ok(self.get_price_list(ctx, id).await?.items)
    }

    /// Sets the price of a product in a list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a negative price.
    /// Returns [`AppError::BadRequest`] if the product is not in the tenant.
    pub async fn set_item_price(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        product_id: Uuid,
        unit_price: Decimal,
    ) -> Result<PriceListItem, AppError> {
        ctx.require_role(Role::Manager)?;
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation(
                "unit_price",
                "unit_price must not be negative",
            ));
        }
        let list = self.get_price_list(ctx, id).await?;
        self.products
            .ensure_reference(list.tenant_id, product_id)
            .await?;

        self.repository
            .upsert_item(
                id,
                PriceListItem {
                    product_id,
                    unit_price,
                },
            )
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product has no price in the list.
    pub async fn remove_item(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        product_id: Uuid,
    ) -> Result<(), AppError> {
        ctx.require_role(Role::Manager)?;
        self.get_price_list(ctx, id).await?;

        if !self.repository.remove_item(id, product_id).await? {
            return Err(AppError::not_found(
                "Product has no price in this list",
                json!({"price_list_id": id, "product_id": product_id}),
            ));
        }
        Ok(())
    }
}

fn validate_validity(
    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if valid_to.is_some_and(|to| to < valid_from) {
        return Err(AppError::validation(
            "valid_to",
            "valid_to must not be before valid_from",
        ));
    }
    Ok(())
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Price list not found", json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockPriceListRepository, MockProductRepository};
    use chrono::Duration;

    fn ctx(role: Role, tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role,
            home_tenant_id: Some(tenant_id),
            tenant_id: Some(tenant_id),
            impersonating: false,
        }
    }

    fn price_list(id: Uuid, tenant_id: Uuid) -> PriceList {
        let now = Utc::now();
        PriceList {
            id,
            tenant_id,
            name: "Retail".to_string(),
            currency: "EUR".to_string(),
            valid_from: now,
            valid_to: None,
            items: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockPriceListRepository, products: MockProductRepository) -> PriceListService {
        PriceListService::new(
            Arc::new(repo),
            Arc::new(ProductService::new(Arc::new(products))),
        )
    }

    #[tokio::test]
    async fn test_create_price_list_uppercases_currency() {
        let mut repo = MockPriceListRepository::new();
        repo.expect_create()
            .withf(|l| l.currency == "EUR")
            .times(1)
            .returning(|l| Ok(price_list(Uuid::new_v4(), l.tenant_id)));

        let result = service(repo, MockProductRepository::new())
            .create_price_list(
                &ctx(Role::Manager, Uuid::new_v4()),
                CreatePriceList {
                    name: "Retail".to_string(),
                    currency: "eur".to_string(),
                    valid_from: None,
                    valid_to: None,
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_price_list_rejects_inverted_validity() {
        let now = Utc::now();
        let result = service(MockPriceListRepository::new(), MockProductRepository::new())
            .create_price_list(
                &ctx(Role::Manager, Uuid::new_v4()),
                CreatePriceList {
                    name: "Retail".to_string(),
                    currency: "EUR".to_string(),
                    valid_from: Some(now),
                    valid_to: Some(now - Duration::days(1)),
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let result = service(MockPriceListRepository::new(), MockProductRepository::new())
            .set_item_price(
                &ctx(Role::Manager, Uuid::new_v4()),
                Uuid::new_v4(),
                Uuid::new_v4(),
                Decimal::new(-100, 2),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_remove_unpriced_item() {
        let tenant = Uuid::new_v4();
        let mut repo = MockPriceListRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(price_list(id, tenant))));
        repo.expect_remove_item().returning(|_, _| Ok(false));

        let result = service(repo, MockProductRepository::new())
            .remove_item(&ctx(Role::Manager, tenant), Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
