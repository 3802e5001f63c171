//! Access token signing and verification
//!
//! Access tokens are short-lived JWTs (HS256) carrying the user id,
//! username, and role. Refresh tokens are opaque and stored server-side;
//! see `services::user`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{User, UserRole};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: i64,
    /// Username
    pub username: String,
    /// User role at issue time
    pub role: UserRole,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Error types for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl TokenSigner {
    /// Create a signer from a shared secret and access-token TTL
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Issue an access token for a user
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// Verify an access token and return its claims
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let mut user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            UserRole::Editor,
        );
        user.id = 42;
        user
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let signer = TokenSigner::new("test-secret", 60);
        let token = signer.issue(&test_user()).expect("Failed to issue token");

        let claims = signer.verify(&token).expect("Token should verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, UserRole::Editor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_wrong_secret_fails() {
        let signer = TokenSigner::new("secret-a", 60);
        let token = signer.issue(&test_user()).expect("Failed to issue token");

        let other = TokenSigner::new("secret-b", 60);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_token_fails() {
        // Negative TTL puts the expiry well past the default leeway
        let signer = TokenSigner::new("test-secret", -5);
        let token = signer.issue(&test_user()).expect("Failed to issue token");

        assert!(matches!(signer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_garbage_fails() {
        let signer = TokenSigner::new("test-secret", 60);
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(TokenError::Invalid(_))
        ));
    }
}
