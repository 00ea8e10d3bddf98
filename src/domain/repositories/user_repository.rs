//! Repository trait for users.

use crate::domain::entities::{NewUser, Role, User, UserPatch};
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Filter for listing users of one tenant.
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub tenant_id: Uuid,
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            search: None,
            role: None,
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    /// In-memory equivalent of the SQL predicate.
    pub fn matches(&self, user: &User) -> bool {
        user.tenant_id == Some(self.tenant_id)
            && self.role.is_none_or(|r| user.role == r)
            && self.search.as_deref().is_none_or(|s| {
                let s = s.to_lowercase();
                user.email.contains(&s) || user.display_name.to_lowercase().contains(&s)
            })
    }
}

/// Repository interface for users.
///
/// Emails are stored lower-case and are globally unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists users ordered by display name.
    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError>;
}
