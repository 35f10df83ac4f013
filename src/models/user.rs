//! User model
//!
//! Users authenticate with a username and password and carry a role that
//! decides whether they may post to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Role attached to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May post transactions, read the ledger and manage users
    #[default]
    Accountant,
    /// Read-only access
    Viewer,
}

impl Role {
    /// Parse role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "accountant" => Some(Self::Accountant),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accountant => write!(f, "accountant"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

/// A registered user
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Login name, unique ignoring case
    pub username: String,

    /// Argon2id PHC string. Never the plaintext.
    pub password_hash: String,

    /// Current role
    pub role: Role,

    /// When the user registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user from an already-computed password hash
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

// Hand-written so the hash never ends up in logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}
