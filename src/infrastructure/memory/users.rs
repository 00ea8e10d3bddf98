use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, missing, paginate, unique_violation};
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{UserFilter, UserRepository};
use crate::error::AppError;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let email = new_user.email.to_lowercase();
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(unique_violation("users_email_key"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: new_user.tenant_id,
            email,
            display_name: new_user.display_name,
            role: new_user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            &tables.users,
            |u| filter.matches(u),
            |a, b| a.email.cmp(&b.email),
            page,
        ))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| missing("User", id))?;

        if let Some(display_name) = patch.display_name {
            user.display_name = display_name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
