//! Per-request tenant context.
//!
//! Built by the authentication middleware from the authenticated [`User`] and
//! the optional `X-Tenant-Id` header, then consumed by services to gate access.
//!
//! # Resolution rules
//!
//! - Super admins have no home tenant. Without the header they act globally
//!   (no active tenant); with it they impersonate the named tenant.
//! - Everybody else is pinned to their home tenant. Naming a different tenant
//!   in the header is a cross-tenant attempt and is rejected with 403.

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Role, User};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub role: Role,
    pub home_tenant_id: Option<Uuid>,
    /// Tenant the request operates on.
    pub tenant_id: Option<Uuid>,
    pub impersonating: bool,
}

impl TenantContext {
    /// Resolves the context for `user`, honoring an impersonation request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if a non-super-admin requests a tenant
    /// other than their own, or if a tenant user has no home tenant.
    pub fn resolve(user: &User, requested_tenant: Option<Uuid>) -> Result<Self, AppError> {
        if user.is_super_admin() {
            return Ok(Self {
                user_id: user.id,
                role: user.role,
                home_tenant_id: None,
                tenant_id: requested_tenant,
                impersonating: requested_tenant.is_some(),
            });
        }

        let home = user.tenant_id.ok_or_else(|| {
            AppError::forbidden(
                "User is not assigned to a tenant",
                json!({"user_id": user.id}),
            )
        })?;

        if let Some(requested) = requested_tenant
            && requested != home
        {
            return Err(AppError::forbidden(
                "Cross-tenant access is not allowed",
                json!({"requested_tenant": requested}),
            ));
        }

        Ok(Self {
            user_id: user.id,
            role: user.role,
            home_tenant_id: Some(home),
            tenant_id: Some(home),
            impersonating: false,
        })
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Returns the active tenant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when the request has no tenant context,
    /// e.g. a super admin calling a tenant-scoped endpoint without `X-Tenant-Id`.
    pub fn require_tenant(&self) -> Result<Uuid, AppError> {
        self.tenant_id.ok_or_else(|| {
            AppError::forbidden(
                "Tenant context required",
                json!({"hint": "Super admins must send the X-Tenant-Id header"}),
            )
        })
    }

    /// Checks that an entity owned by `tenant_id` may be touched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for cross-tenant access.
    pub fn ensure_access(&self, tenant_id: Uuid) -> Result<(), AppError> {
        if self.is_super_admin() || self.tenant_id == Some(tenant_id) {
            return Ok(());
        }
        Err(AppError::forbidden(
            "Access to a resource of another tenant is not allowed",
            json!({}),
        ))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the caller's role is below `min`.
    pub fn require_role(&self, min: Role) -> Result<(), AppError> {
        if self.role >= min {
            return Ok(());
        }
        Err(AppError::forbidden(
            "Insufficient role for this operation",
            json!({"required": min.as_str(), "actual": self.role.as_str()}),
        ))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the caller is a super admin.
    pub fn require_super_admin(&self) -> Result<(), AppError> {
        self.require_role(Role::SuperAdmin)
    }
}
