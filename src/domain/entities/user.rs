//! User entity and role hierarchy.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

/// Privilege level of a user.
///
/// Variants are declared in ascending order of privilege so the derived
/// `Ord` can be used for "at least" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Manager,
    TenantAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::TenantAdmin => "tenant_admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Largest page size a caller with this role may request.
    pub fn page_size_cap(&self) -> u32 {
        match self {
            Role::Staff => 100,
            Role::Manager => 200,
            Role::TenantAdmin => 500,
            Role::SuperAdmin => 1000,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Role::Staff),
            "manager" => Ok(Role::Manager),
            "tenant_admin" => Ok(Role::TenantAdmin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// An authenticated principal.
///
/// `tenant_id` is `None` exactly for super admins, who are not bound to a
/// tenant and act on one through impersonation.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// True when the patch touches anything besides the display name.
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::SuperAdmin > Role::TenantAdmin);
        assert!(Role::TenantAdmin > Role::Manager);
        assert!(Role::Manager > Role::Staff);
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [Role::Staff, Role::Manager, Role::TenantAdmin, Role::SuperAdmin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_page_size_caps_grow_with_privilege() {
        assert_eq!(Role::Staff.page_size_cap(), 100);
        assert_eq!(Role::Manager.page_size_cap(), 200);
        assert_eq!(Role::TenantAdmin.page_size_cap(), 500);
        assert_eq!(Role::SuperAdmin.page_size_cap(), 1000);
    }

    #[test]
    fn test_patch_privileged_fields() {
        let patch = UserPatch {
            display_name: Some("Ann".to_string()),
            ..Default::default()
        };
        assert!(!patch.touches_privileged_fields());

        let patch = UserPatch {
            role: Some(Role::Manager),
            ..Default::default()
        };
        assert!(patch.touches_privileged_fields());
    }
}
