//! Refresh token model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side refresh token issued at login.
///
/// The token value itself is the primary key; deleting the row invalidates
/// the token (logout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Opaque token value
    pub id: String,
    /// Associated user ID
    pub user_id: i64,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
