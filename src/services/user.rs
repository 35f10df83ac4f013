//! User service
//!
//! Registration, login and role management.

use crate::audit::{AuditEntry, EntityType};
use crate::auth::password::verify_against_dummy;
use crate::auth::{hash_password, require, verify_password, Operation, PasswordParams, Session};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Role, User};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
    params: PasswordParams,
}

impl<'a> UserService<'a> {
    /// Create a new user service using default hashing cost
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            params: PasswordParams::default(),
        }
    }

    /// Create a user service that hashes new passwords with `params`
    pub fn with_params(storage: &'a Storage, params: PasswordParams) -> Self {
        Self { storage, params }
    }

    /// Register a new user
    pub fn register(&self, username: &str, password: &str, role: Role) -> LedgerResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::Validation("Username is required".into()));
        }
        if password.is_empty() {
            return Err(LedgerError::Validation("Password is required".into()));
        }

        // Cheap early exit; insert_unique re-checks under the lock
        if self.storage.users.get_by_username(username)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }

        let hash = hash_password(password, &self.params)?;
        let user = User::new(username, hash, role);
        self.storage.users.insert_unique(user.clone())?;

        tracing::info!(username = %user.username, role = %user.role, "user registered");
        self.storage.record(AuditEntry::create(
            EntityType::User,
            user.id.as_uuid().to_string(),
            Some(user.username.clone()),
            &serde_json::json!({ "username": user.username, "role": user.role }),
        ));

        Ok(user)
    }

    /// Check credentials and open a session.
    ///
    /// Unknown users and wrong passwords produce the same error, and both
    /// paths run one Argon2 verification.
    pub fn authenticate(&self, username: &str, password: &str) -> LedgerResult<Session> {
        let user = self.storage.users.get_by_username(username.trim())?;

        let verified = match &user {
            Some(user) => verify_password(password, &user.password_hash),
            None => {
                verify_against_dummy(password);
                false
            }
        };

        match user {
            Some(user) if verified => {
                tracing::debug!(username = %user.username, "authenticated");
                Ok(Session::for_user(&user))
            }
            _ => {
                tracing::warn!(username = %username.trim(), "failed login");
                Err(LedgerError::AuthenticationFailed)
            }
        }
    }

    /// Change another user's role. Requires the ManageUsers permission,
    /// checked against the caller's stored role.
    pub fn set_role(&self, session: &Session, username: &str, role: Role) -> LedgerResult<User> {
        let caller = self.current_user(session)?;
        require(caller.role, Operation::ManageUsers)?;

        let before = self
            .storage
            .users
            .get_by_username(username.trim())?
            .ok_or_else(|| LedgerError::user_not_found(username.trim()))?;

        if before.role == role {
            return Ok(before);
        }

        let mut after = before.clone();
        after.role = role;
        self.storage.users.update(after.clone())?;

        tracing::info!(
            username = %after.username,
            from = %before.role,
            to = %after.role,
            by = %caller.username,
            "role changed"
        );
        self.storage.record(
            AuditEntry::update(
                EntityType::User,
                after.id.as_uuid().to_string(),
                Some(after.username.clone()),
                &serde_json::json!({ "role": before.role }),
                &serde_json::json!({ "role": after.role }),
                Some(format!("role: {} -> {}", before.role, after.role)),
            )
            .by(caller.username),
        );

        Ok(after)
    }

    /// Get a user by username
    pub fn get(&self, username: &str) -> LedgerResult<Option<User>> {
        self.storage.users.get_by_username(username.trim())
    }

    /// List all users
    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// The stored user behind a session. A session whose user has vanished
    /// is not authorized for anything.
    pub fn current_user(&self, session: &Session) -> LedgerResult<User> {
        self.storage
            .users
            .get(session.user_id())?
            .ok_or_else(|| {
                LedgerError::Authorization(format!(
                    "user '{}' no longer exists",
                    session.username()
                ))
            })
    }
}
