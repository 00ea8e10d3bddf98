use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{MemoryStore, unique_violation};
use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = tables
            .tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: Uuid,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut tables = self.tables.write().await;
        if tables.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(unique_violation("api_tokens_token_hash_key"));
        }

        let token = ApiToken {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tables.tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self, user_id: Option<Uuid>) -> Result<Vec<ApiToken>, AppError> {
        let tables = self.tables.read().await;
        let mut tokens: Vec<ApiToken> = tables
            .tokens
            .iter()
            .filter(|t| user_id.is_none_or(|u| t.user_id == u))
            .cloned()
            .collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiToken>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn revoke_token(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .tokens
            .iter_mut()
            .find(|t| t.id == id && !t.is_revoked())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let mut revoked = 0;
        for token in tables
            .tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && !t.is_revoked())
        {
            token.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }
}
