//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        tracing::debug!(count = data.len(), "loaded users");
        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &UserData { users })
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get a user by username (case-insensitive)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let wanted = username.to_lowercase();
        Ok(data
            .values()
            .find(|u| u.username.to_lowercase() == wanted)
            .cloned())
    }

    /// Get all users, oldest first
    pub fn get_all(&self) -> Result<Vec<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Insert a user unless the username is taken, then persist.
    ///
    /// The uniqueness check and the insert happen under one write lock, so two
    /// concurrent registrations of the same name cannot both succeed.
    pub fn insert_unique(&self, user: User) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let wanted = user.username.to_lowercase();
        if data.values().any(|u| u.username.to_lowercase() == wanted) {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: user.username,
            });
        }

        let id = user.id;
        data.insert(id, user);

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if let Err(e) = write_json_atomic(&self.path, &UserData { users }) {
            data.remove(&id);
            return Err(e);
        }

        Ok(())
    }

    /// Replace an existing user and persist; rolls back on write failure
    pub fn update(&self, user: User) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let previous = data
            .insert(user.id, user.clone())
            .ok_or_else(|| LedgerError::user_not_found(user.username.clone()))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if let Err(e) = write_json_atomic(&self.path, &UserData { users }) {
            data.insert(previous.id, previous);
            return Err(e);
        }

        Ok(())
    }

    /// Count users
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let (_temp_dir, repo) = create_test_repo();
        let user = User::new("Alice", "hash", Role::Accountant);
        let id = user.id;

        repo.insert_unique(user).unwrap();

        assert_eq!(repo.get(id).unwrap().unwrap().username, "Alice");
        assert_eq!(repo.get_by_username("alice").unwrap().unwrap().id, id);
        assert!(repo.get_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert_unique(User::new("alice", "h1", Role::Accountant))
            .unwrap();

        let err = repo
            .insert_unique(User::new("ALICE", "h2", Role::Viewer))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_persists() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert_unique(User::new("alice", "hash", Role::Viewer))
            .unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();
        let loaded = repo2.get_by_username("alice").unwrap().unwrap();
        assert_eq!(loaded.role, Role::Viewer);
        assert_eq!(loaded.password_hash, "hash");
    }

    #[test]
    fn test_update_role() {
        let (_temp_dir, repo) = create_test_repo();
        let mut user = User::new("alice", "hash", Role::Viewer);
        repo.insert_unique(user.clone()).unwrap();

        user.role = Role::Accountant;
        repo.update(user.clone()).unwrap();
        assert_eq!(repo.get(user.id).unwrap().unwrap().role, Role::Accountant);
    }

    #[test]
    fn test_update_unknown_user() {
        let (_temp_dir, repo) = create_test_repo();
        let user = User::new("ghost", "hash", Role::Viewer);
        assert!(repo.update(user).unwrap_err().is_not_found());
    }
}
