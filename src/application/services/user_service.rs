//! User management service.

use crate::application::services::auth_service::AuthService;
use crate::domain::entities::{NewUser, Role, User, UserPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{UserFilter, UserRepository};
use crate::domain::tenant_context::TenantContext;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Input for creating a user inside the active tenant.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

/// Service for managing the users of a tenant.
///
/// # Privilege rules
///
/// - Listing needs Manager; creating and administrative updates need TenantAdmin
/// - Nobody can grant a role above their own
/// - The SuperAdmin role is never granted through this service
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, auth: Arc<AuthService>) -> Self {
        Self { repository, auth }
    }

    /// Lists users of the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without tenant context or below Manager.
    pub async fn list_users(
        &self,
        ctx: &TenantContext,
        search: Option<String>,
        role: Option<Role>,
        page: PageRequest,
    ) -> Result<Page<User>, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::Manager)?;

        let filter = UserFilter::new(tenant_id)
            .with_search(search)
            .with_role(role);
        self.repository.list(filter, page).await
    }

    /// Creates a user in the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] below TenantAdmin or when granting a
    /// role above the caller's own (or SuperAdmin).
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn create_user(
        &self,
        ctx: &TenantContext,
        input: CreateUser,
    ) -> Result<User, AppError> {
        let tenant_id = ctx.require_tenant()?;
        ctx.require_role(Role::TenantAdmin)?;
        ensure_grantable(ctx, input.role)?;

        let email = input.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({"email": email}),
            ));
        }

        let user = self
            .repository
            .create(NewUser {
                tenant_id: Some(tenant_id),
                email,
                display_name: input.display_name,
                role: input.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, %tenant_id, role = %user.role, "User created");
        Ok(user)
    }

    /// Returns the calling user.
    pub async fn me(&self, ctx: &TenantContext) -> Result<User, AppError> {
        self.repository
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({"id": ctx.user_id})))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Forbidden`] if the user belongs to another tenant.
    pub async fn get_user(&self, ctx: &TenantContext, id: Uuid) -> Result<User, AppError> {
        self.load(ctx, id).await
    }

    /// Updates a user.
    ///
    /// Users may change their own display name. Changing role or active flag,
    /// or anything about another user, needs TenantAdmin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] on insufficient privileges.
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn update_user(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        let target = self.load(ctx, id).await?;

        let is_self = target.id == ctx.user_id;
        if !is_self || patch.touches_privileged_fields() {
            ctx.require_role(Role::TenantAdmin)?;
        }
        if target.role > ctx.role {
            return Err(AppError::forbidden(
                "Cannot modify a user with a higher role",
                json!({"id": id}),
            ));
        }
        if let Some(role) = patch.role {
            ensure_grantable(ctx, role)?;
        }
        if is_self && patch.is_active == Some(false) {
            return Err(AppError::bad_request(
                "Users cannot deactivate themselves",
                json!({}),
            ));
        }

        let deactivating = patch.is_active == Some(false) && target.is_active;
        let updated = self.repository.update(id, patch).await?;
        if deactivating {
            self.auth.revoke_tokens_for_user(id).await?;
        }
        Ok(updated)
    }

    /// Deactivates a user and revokes all of their tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when users try to delete themselves.
    /// Returns [`AppError::Forbidden`] below TenantAdmin.
    pub async fn deactivate_user(&self, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
        ctx.require_role(Role::TenantAdmin)?;
        if id == ctx.user_id {
            return Err(AppError::bad_request(
                "Users cannot delete themselves",
                json!({"id": id}),
            ));
        }

        let target = self.load(ctx, id).await?;
        if target.role > ctx.role {
            return Err(AppError::forbidden(
                "Cannot delete a user with a higher role",
                json!({"id": id}),
            ));
        }

        self.repository
            .update(
                id,
                UserPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        self.auth.revoke_tokens_for_user(id).await?;
        tracing::info!(user_id = %id, "User deactivated");
        Ok(())
    }

    async fn load(&self, ctx: &TenantContext, id: Uuid) -> Result<User, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({"id": id})))?;

        match user.tenant_id {
            Some(tenant_id) => ctx.ensure_access(tenant_id)?,
            None => ctx.require_super_admin()?,
        }
        Ok(user)
    }
}

fn ensure_grantable(ctx: &TenantContext, role: Role) -> Result<(), AppError> {
    if role == Role::SuperAdmin || role > ctx.role {
        return Err(AppError::forbidden(
            "Cannot grant a role above your own",
            json!({"role": role.as_str()}),
        ));
    }
    Ok(())
}
