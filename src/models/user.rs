//! User model
//!
//! This module defines the User entity and the role-based permission model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered author.
///
/// Users have roles (Admin, Editor, Author) which determine what content
/// they may modify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User.
    ///
    /// The password must already be hashed; see
    /// `services::password::hash_password()`.
    pub fn new(username: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if the user is an editor (or higher)
    pub fn is_editor(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Editor)
    }

    /// Check if the user can edit content owned by `author_id`.
    ///
    /// Admins and Editors can edit any content; Authors only their own.
    pub fn can_edit(&self, author_id: i64) -> bool {
        self.is_editor() || self.id == author_id
    }
}

/// User role for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access
    Admin,
    /// Editor - can edit all content
    Editor,
    /// Author - can only edit own content
    #[default]
    Author,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Editor => write!(f, "editor"),
            UserRole::Author => write!(f, "author"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "author" => Ok(UserRole::Author),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "hash".to_string(),
            role,
        )
    }

    #[test]
    fn test_user_new() {
        let u = user(UserRole::Author);

        assert_eq!(u.id, 0);
        assert_eq!(u.username, "testuser");
        assert_eq!(u.email, "test@example.com");
        assert_eq!(u.role, UserRole::Author);
    }

    #[test]
    fn test_user_is_admin() {
        assert!(user(UserRole::Admin).is_admin());
        assert!(!user(UserRole::Editor).is_admin());
        assert!(!user(UserRole::Author).is_admin());
    }

    #[test]
    fn test_user_is_editor() {
        assert!(user(UserRole::Admin).is_editor());
        assert!(user(UserRole::Editor).is_editor());
        assert!(!user(UserRole::Author).is_editor());
    }

    #[test]
    fn test_user_can_edit() {
        let mut admin = user(UserRole::Admin);
        admin.id = 1;

        let mut author = user(UserRole::Author);
        author.id = 2;

        // Admin can edit anyone's content
        assert!(admin.can_edit(1));
        assert!(admin.can_edit(2));
        assert!(admin.can_edit(999));

        // Author can only edit own content
        assert!(author.can_edit(2));
        assert!(!author.can_edit(1));
        assert!(!author.can_edit(999));
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Editor.to_string(), "editor");
        assert_eq!(UserRole::Author.to_string(), "author");
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("Editor").unwrap(), UserRole::Editor);
        assert_eq!(UserRole::from_str("author").unwrap(), UserRole::Author);
        assert!(UserRole::from_str("invalid").is_err());
    }

    #[test]
    fn test_user_role_default() {
        assert_eq!(UserRole::default(), UserRole::Author);
    }
}
