//! Authentication service for API token validation and issuance.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::repositories::{ApiToken, TenantRepository, TokenRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 48;

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
    tenants: Arc<dyn TenantRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        users: Arc<dyn UserRepository>,
        tenants: Arc<dyn TenantRepository>,
        signing_secret: String,
    ) -> Self {
        Self {
            tokens,
            users,
            tenants,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves a raw bearer token to its owning user.
    ///
    /// On success the token's `last_used_at` is refreshed; failures of that
    /// update are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked,
    /// or its user no longer exists.
    /// Returns [`AppError::Forbidden`] if the user is inactive, or the user's
    /// tenant is inactive or deleted.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let token_hash = self.hash_token(token);

        let Some(api_token) = self.tokens.find_active_by_hash(&token_hash).await? else {
            metrics::counter!("auth_failures_total", "reason" => "invalid_token").increment(1);
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        let user = self
            .users
            .find_by_id(api_token.user_id)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Unknown token owner"}))
            })?;

        if !user.is_active {
            metrics::counter!("auth_failures_total", "reason" => "inactive_user").increment(1);
            return Err(AppError::forbidden("User is inactive", json!({})));
        }

        if let Some(tenant_id) = user.tenant_id {
            let usable = self
                .tenants
                .find_by_id(tenant_id)
                .await?
                .is_some_and(|t| t.is_usable());
            if !usable {
                metrics::counter!("auth_failures_total", "reason" => "inactive_tenant")
                    .increment(1);
                return Err(AppError::forbidden(
                    "Tenant is inactive or deleted",
                    json!({"tenant_id": tenant_id}),
                ));
            }
        }

        if let Err(e) = self.tokens.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(user)
    }

    /// Issues a new token for `user_id` and returns it with its raw value.
    ///
    /// The raw value is 48 alphanumeric characters and is never stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn issue_token(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<(ApiToken, String), AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found(
                "User not found",
                json!({"id": user_id}),
            ));
        }

        let raw = generate_token();
        let token = self
            .tokens
            .create_token(user_id, name, &self.hash_token(&raw))
            .await?;
        Ok((token, raw))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_tokens(&self, user_id: Option<Uuid>) -> Result<Vec<ApiToken>, AppError> {
        self.tokens.list_tokens(user_id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is missing or already revoked.
    pub async fn revoke_token(&self, id: Uuid) -> Result<(), AppError> {
        if self.tokens.revoke_token(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Token not found or already revoked",
                json!({"id": id}),
            ))
        }
    }

    /// Revokes every active token of a user. Used when a user is deactivated.
    pub async fn revoke_tokens_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let revoked = self.tokens.revoke_for_user(user_id).await?;
        tracing::info!(%user_id, revoked, "Revoked user tokens");
        Ok(revoked)
    }
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Role, Tenant};
    use crate::domain::repositories::{
        MockTenantRepository, MockTokenRepository, MockUserRepository,
    };
    use chrono::Utc;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn api_token(user_id: Uuid) -> ApiToken {
        ApiToken {
            id: Uuid::new_v4(),
            user_id,
            name: "ci".to_string(),
            token_hash: "hash".to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        }
    }

    fn user(tenant_id: Option<Uuid>, role: Role, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id,
            email: "ann@example.com".to_string(),
            display_name: "Ann".to_string(),
            role,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tenant(id: Uuid, is_active: bool) -> Tenant {
        Tenant {
            id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn service(
        tokens: MockTokenRepository,
        users: MockUserRepository,
        tenants: MockTenantRepository,
    ) -> AuthService {
        AuthService::new(
            Arc::new(tokens),
            Arc::new(users),
            Arc::new(tenants),
            test_secret(),
        )
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let tenant_id = Uuid::new_v4();
        let owner = user(Some(tenant_id), Role::Staff, true);
        let owner_id = owner.id;

        let hasher = service(
            MockTokenRepository::new(),
            MockUserRepository::new(),
            MockTenantRepository::new(),
        );
        let expected_hash = hasher.hash_token("valid-token");

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(move |_| Ok(Some(api_token(owner_id))));
        tokens
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));

        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(move |id| Ok(Some(tenant(id, true))));

        let result = service(tokens, users, tenants).authenticate("valid-token").await;

        assert_eq!(result.unwrap().id, owner_id);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(tokens, MockUserRepository::new(), MockTenantRepository::new())
            .authenticate("invalid-token")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_user_is_forbidden() {
        let owner = user(Some(Uuid::new_v4()), Role::Staff, false);
        let owner_id = owner.id;

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .returning(move |_| Ok(Some(api_token(owner_id))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));

        let result = service(tokens, users, MockTenantRepository::new())
            .authenticate("token")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_tenant_is_forbidden() {
        let owner = user(Some(Uuid::new_v4()), Role::Manager, true);
        let owner_id = owner.id;

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .returning(move |_| Ok(Some(api_token(owner_id))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(move |id| Ok(Some(tenant(id, false))));

        let result = service(tokens, users, tenants).authenticate("token").await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_super_admin_skips_tenant_check() {
        let owner = user(None, Role::SuperAdmin, true);
        let owner_id = owner.id;

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .returning(move |_| Ok(Some(api_token(owner_id))));
        tokens.expect_update_last_used().returning(|_| Ok(()));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));

        let result = service(tokens, users, MockTenantRepository::new())
            .authenticate("token")
            .await;

        assert!(result.unwrap().is_super_admin());
    }

    #[tokio::test]
    async fn test_last_used_failure_is_ignored() {
        let owner = user(None, Role::SuperAdmin, true);
        let owner_id = owner.id;

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_active_by_hash()
            .returning(move |_| Ok(Some(api_token(owner_id))));
        tokens
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("db down", json!({}))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));

        let result = service(tokens, users, MockTenantRepository::new())
            .authenticate("token")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_issue_token_stores_hash_of_raw_value() {
        let owner = user(None, Role::SuperAdmin, true);
        let owner_id = owner.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_create_token()
            .times(1)
            .returning(|user_id, name, hash| {
                let mut t = api_token(user_id);
                t.name = name.to_string();
                t.token_hash = hash.to_string();
                Ok(t)
            });

        let svc = service(tokens, users, MockTenantRepository::new());
        let (token, raw) = svc.issue_token(owner_id, "ci").await.unwrap();

        assert_eq!(raw.len(), 48);
        assert!(raw.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(token.token_hash, svc.hash_token(&raw));
        assert_eq!(token.name, "ci");
    }

    #[tokio::test]
    async fn test_revoke_missing_token() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_revoke_token().returning(|_| Ok(false));

        let result = service(tokens, MockUserRepository::new(), MockTenantRepository::new())
            .revoke_token(Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_hash_token_consistency() {
        let svc = service(
            MockTokenRepository::new(),
            MockUserRepository::new(),
            MockTenantRepository::new(),
        );

        let hash1 = svc.hash_token("test-token");
        let hash2 = svc.hash_token("test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, svc.hash_token("other-token"));
    }

    #[test]
    fn test_hash_token_secret_matters() {
        let svc1 = AuthService::new(
            Arc::new(MockTokenRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTenantRepository::new()),
            "secret-a".to_string(),
        );
        let svc2 = AuthService::new(
            Arc::new(MockTokenRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTenantRepository::new()),
            "secret-b".to_string(),
        );

        assert_ne!(svc1.hash_token("token"), svc2.hash_token("token"));
    }
}
