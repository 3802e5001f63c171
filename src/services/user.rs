//! User service
//!
//! Implements business logic for users and authentication:
//! - Registration (first user becomes admin)
//! - Login issuing an access/refresh token pair
//! - Refresh-token exchange for new access tokens
//! - Logout (refresh token invalidation)
//! - Access-token validation for the auth middleware

use crate::db::repositories::{RefreshTokenRepository, UserRepository};
use crate::models::{RefreshToken, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenSigner;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Refresh token expired
    #[error("Refresh token expired")]
    TokenExpired,

    /// Refresh token not found
    #[error("Refresh token not found")]
    TokenNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Access/refresh token pair issued at login
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived signed access token
    pub access: String,
    /// Opaque server-side refresh token
    pub refresh: String,
}

/// User service for managing users and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    token_repo: Arc<dyn RefreshTokenRepository>,
    signer: TokenSigner,
    refresh_ttl_days: i64,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn RefreshTokenRepository>,
        signer: TokenSigner,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            signer,
            refresh_ttl_days,
        }
    }

    /// Register a new user.
    ///
    /// The first user in the system is assigned the Admin role; later users
    /// register as Authors.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username, email, or password is invalid
    /// - `UserExists` if username or email is already taken
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        self.validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        // First user becomes admin
        let is_first = self.is_first_user().await?;
        let role = if is_first {
            UserRole::Admin
        } else {
            UserRole::Author
        };

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.username, input.email, password_hash, role);

        let created_user = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        Ok(created_user)
    }

    /// Login with credentials and issue an access/refresh token pair.
    ///
    /// The username field also accepts the account email.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if credentials are invalid
    pub async fn login(&self, input: LoginInput) -> Result<(User, TokenPair), UserServiceError> {
        let user = self
            .find_user_by_username_or_email(&input.username)
            .await?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError("Invalid username or password".to_string())
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        let pair = self.issue_token_pair(&user).await?;

        Ok((user, pair))
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// - `TokenNotFound` if the refresh token doesn't exist (e.g. after logout)
    /// - `TokenExpired` if the refresh token has expired
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, UserServiceError> {
        let token = self
            .token_repo
            .get_by_id(refresh_token)
            .await
            .context("Failed to get refresh token")?
            .ok_or(UserServiceError::TokenNotFound)?;

        if token.is_expired() {
            // Expired tokens are dead weight, remove them
            let _ = self.token_repo.delete(refresh_token).await;
            return Err(UserServiceError::TokenExpired);
        }

        let user = self
            .user_repo
            .get_by_id(token.user_id)
            .await
            .context("Failed to get user")?
            .ok_or(UserServiceError::TokenNotFound)?;

        let access = self
            .signer
            .issue(&user)
            .map_err(|e| UserServiceError::InternalError(anyhow::anyhow!(e)))?;

        Ok(access)
    }

    /// Logout: invalidate the given refresh token.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), UserServiceError> {
        self.token_repo
            .delete(refresh_token)
            .await
            .context("Failed to delete refresh token")?;

        Ok(())
    }

    /// Validate an access token and return the associated user.
    ///
    /// Returns `None` for invalid or expired tokens, or when the user no
    /// longer exists.
    pub async fn authenticate(&self, access_token: &str) -> Result<Option<User>, UserServiceError> {
        let claims = match self.signer.verify(access_token) {
            Ok(claims) => claims,
            Err(_) => return Ok(None),
        };

        let user = self
            .user_repo
            .get_by_id(claims.sub)
            .await
            .context("Failed to get user")?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to get user by username")?;

        Ok(user)
    }

    /// Check if this is the first user (for auto-admin)
    pub async fn is_first_user(&self) -> Result<bool, UserServiceError> {
        let count = self
            .user_repo
            .count()
            .await
            .context("Failed to count users")?;

        Ok(count == 0)
    }

    /// Delete all expired refresh tokens.
    ///
    /// Maintenance operation; returns the number of tokens deleted.
    pub async fn cleanup_expired_tokens(&self) -> Result<i64, UserServiceError> {
        let count = self
            .token_repo
            .delete_expired()
            .await
            .context("Failed to delete expired refresh tokens")?;

        Ok(count)
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    /// Validate registration input
    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), UserServiceError> {
        if input.username.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        if input.email.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }

        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        // Basic email format validation
        if !input.email.contains('@') {
            return Err(UserServiceError::ValidationError(
                "Invalid email format".to_string(),
            ));
        }

        Ok(())
    }

    /// Find user by username or email
    async fn find_user_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<User>, UserServiceError> {
        if let Some(user) = self
            .user_repo
            .get_by_username(username_or_email)
            .await
            .context("Failed to get user by username")?
        {
            return Ok(Some(user));
        }

        let user = self
            .user_repo
            .get_by_email(username_or_email)
            .await
            .context("Failed to get user by email")?;

        Ok(user)
    }

    /// Issue an access/refresh token pair for a user
    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, UserServiceError> {
        let access = self
            .signer
            .issue(user)
            .map_err(|e| UserServiceError::InternalError(anyhow::anyhow!(e)))?;

        let now = Utc::now();
        let refresh = RefreshToken {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            expires_at: now + Duration::days(self.refresh_ttl_days),
            created_at: now,
        };

        let stored = self
            .token_repo
            .create(&refresh)
            .await
            .context("Failed to store refresh token")?;

        Ok(TokenPair {
            access,
            refresh: stored.id,
        })
    }
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    /// Create a new registration input
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Username or email
    pub username: String,
    pub password: String,
}

impl LoginInput {
    /// Create a new login input
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
