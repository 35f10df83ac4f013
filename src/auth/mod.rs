//! Access control for FundLedger
//!
//! - `password`: Argon2id hashing and verification of credentials
//! - `session`: the request-scoped [`Session`] handed out on login
//! - [`authorize`]: the role/operation permission table
//!
//! Registration and login live in [`crate::services::UserService`].

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password, PasswordParams};
pub use session::Session;

use std::fmt;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Role;

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Post income or expenses, rebuild the cached balance
    PostTransaction,
    /// Read balances, transactions, breakdowns and exports
    ViewLedger,
    /// Change other users' roles
    ManageUsers,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::PostTransaction => write!(f, "post transactions"),
            Operation::ViewLedger => write!(f, "view the ledger"),
            Operation::ManageUsers => write!(f, "manage users"),
        }
    }
}

/// Whether `role` may perform `operation`
pub fn authorize(role: Role, operation: Operation) -> bool {
    match role {
        Role::Accountant => true,
        Role::Viewer => matches!(operation, Operation::ViewLedger),
    }
}

/// [`authorize`] as a `Result`, for use with `?`
pub fn require(role: Role, operation: Operation) -> LedgerResult<()> {
    if authorize(role, operation) {
        Ok(())
    } else {
        Err(LedgerError::Authorization(format!(
            "role '{}' may not {}",
            role, operation
        )))
    }
}
