//! Admin authentication: password login, bearer tokens, and credential upkeep.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::UserRecord;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("current password is incorrect")]
    IncorrectPassword,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("username must not be blank")]
    BlankUsername,
    #[error("user `{0}` already exists")]
    UserExists(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Token signing parameters.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
}

/// The authenticated admin behind a request.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub user_id: i64,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    tokens: TokenConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepo>, tokens: TokenConfig) -> Self {
        Self { users, tokens }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password_blocking(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.issue_token(&user.username)?;
        info!(target = "folio::auth", username = %user.username, "admin logged in");

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
        })
    }

    /// Resolve a bearer token to the admin it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.tokens.secret),
            &validation,
        )
        .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_username(&data.claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AdminIdentity {
            user_id: user.id,
            username: user.username,
        })
    }

    pub async fn change_password(
        &self,
        identity: &AdminIdentity,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        ensure_password_strength(new_password)?;

        let user = self
            .users
            .find_by_username(&identity.username)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !verify_password_blocking(current_password, &user.password_hash).await? {
            return Err(AuthError::IncorrectPassword);
        }

        let hash = hash_password_blocking(new_password).await?;
        self.users.update_password(user.id, &hash).await?;
        info!(target = "folio::auth", username = %user.username, "admin password changed");
        Ok(())
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> Result<UserRecord, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::BlankUsername);
        }
        ensure_password_strength(password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UserExists(username.to_string()));
        }

        let hash = hash_password_blocking(password).await?;
        match self.users.create_user(username, &hash).await {
            Ok(user) => Ok(user),
            Err(RepoError::Duplicate { .. }) => Err(AuthError::UserExists(username.to_string())),
            Err(err) => Err(AuthError::Repo(err)),
        }
    }

    fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + self.tokens.ttl).unix_timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.tokens.secret),
        )
        .map_err(|err| AuthError::Signing(err.to_string()))
    }
}

fn ensure_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| AuthError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_password_blocking(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AuthError::Hashing(err.to_string()))?
}

async fn verify_password_blocking(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|err| AuthError::Hashing(err.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<UserRecord>>,
    }

    #[async_trait]
    impl UsersRepo for MemoryUsers {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
            let users = self.users.lock().await;
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn create_user(
            &self,
            username: &str,
            password_hash: &str,
        ) -> Result<UserRecord, RepoError> {
            let mut users = self.users.lock().await;
            let record = UserRecord {
                id: users.len() as i64 + 1,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(record.clone());
            Ok(record)
        }

        async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), RepoError> {
            let mut users = self.users.lock().await;
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(RepoError::NotFound)?;
            user.password_hash = password_hash.to_string();
            Ok(())
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUsers::default()),
            TokenConfig::new("test-secret-test-secret-test-secret", Duration::minutes(5)),
        )
    }

    #[tokio::test]
    async fn login_issues_token_that_authenticates() {
        let auth = service();
        auth.create_admin("admin", "correct horse").await.expect("admin");

        let token = auth.login("admin", "correct horse").await.expect("token");
        assert_eq!(token.token_type, "bearer");

        let identity = auth
            .authenticate(&token.access_token)
            .await
            .expect("identity");
        assert_eq!(identity.username, "admin");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let auth = service();
        auth.create_admin("admin", "correct horse").await.expect("admin");

        let wrong = auth.login("admin", "battery staple").await.expect_err("wrong password");
        let unknown = auth.login("nobody", "correct horse").await.expect_err("unknown");
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn tokens_signed_with_another_secret_are_rejected() {
        let auth = service();
        auth.create_admin("admin", "correct horse").await.expect("admin");

        let other = AuthService::new(
            Arc::new(MemoryUsers::default()),
            TokenConfig::new("another-secret-another-secret", Duration::minutes(5)),
        );
        other.create_admin("admin", "correct horse").await.expect("admin");
        let foreign = other.login("admin", "correct horse").await.expect("token");

        let err = auth
            .authenticate(&foreign.access_token)
            .await
            .expect_err("foreign token");
        assert!(matches!(err, AuthError::InvalidToken));
        assert!(matches!(
            auth.authenticate("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let users = Arc::new(MemoryUsers::default());
        let auth = AuthService::new(
            users.clone(),
            TokenConfig::new("test-secret-test-secret", Duration::minutes(-10)),
        );
        auth.create_admin("admin", "correct horse").await.expect("admin");
        let token = auth.login("admin", "correct horse").await.expect("token");

        assert!(matches!(
            auth.authenticate(&token.access_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn create_admin_validates_input() {
        let auth = service();
        assert!(matches!(
            auth.create_admin("  ", "long enough").await,
            Err(AuthError::BlankUsername)
        ));
        assert!(matches!(
            auth.create_admin("admin", "short").await,
            Err(AuthError::WeakPassword)
        ));
        auth.create_admin("admin", "long enough").await.expect("admin");
        assert!(matches!(
            auth.create_admin("admin", "long enough").await,
            Err(AuthError::UserExists(_))
        ));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let auth = service();
        let user = auth.create_admin("admin", "correct horse").await.expect("admin");
        let identity = AdminIdentity {
            user_id: user.id,
            username: user.username,
        };

        let err = auth
            .change_password(&identity, "wrong password", "new password")
            .await
            .expect_err("wrong current");
        assert!(matches!(err, AuthError::IncorrectPassword));

        let err = auth
            .change_password(&identity, "correct horse", "short")
            .await
            .expect_err("weak");
        assert!(matches!(err, AuthError::WeakPassword));

        auth.change_password(&identity, "correct horse", "new password")
            .await
            .expect("changed");
        assert!(auth.login("admin", "new password").await.is_ok());
        assert!(auth.login("admin", "correct horse").await.is_err());
    }
}
