//! Storage layer for FundLedger
//!
//! Provides JSON file storage with atomic writes, a lock-guarded ledger
//! repository and the audit trail.

pub mod file_io;
pub mod init;
pub mod ledger;
pub mod users;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use ledger::{LedgerRepository, LedgerState};
pub use users::UserRepository;

use std::time::Duration;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::LedgerPaths;
use crate::config::Settings;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub users: UserRepository,
    pub ledger: LedgerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance with the default lock timeout
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        Self::with_lock_timeout(paths, Settings::default().lock_timeout())
    }

    /// Create a new Storage instance whose postings wait at most `lock_timeout`
    pub fn with_lock_timeout(
        paths: LedgerPaths,
        lock_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            ledger: LedgerRepository::new(paths.ledger_file(), lock_timeout),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.users.load()?;
        self.ledger.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// The audit trail
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append to the audit trail. Called after the fact, so a failure here is
    /// reported but never undoes or fails the operation being recorded.
    pub fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::error!(
                operation = %entry.operation,
                entity = %entry.entity_type,
                id = %entry.entity_id,
                error = %e,
                "failed to write audit entry"
            );
        }
    }
}
