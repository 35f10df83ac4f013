//! Credential handling for CLI commands
//!
//! Every command that touches the ledger logs in first. The username comes
//! from `--user`/`FUNDLEDGER_USER`; the password from `--password`/
//! `FUNDLEDGER_PASSWORD`, or a hidden prompt when neither is set.

use zeroize::Zeroizing;

use crate::auth::{require, Operation, Session};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::services::UserService;
use crate::storage::Storage;

/// Credentials supplied on the command line or through the environment
pub struct Credentials {
    user: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl Credentials {
    pub fn new(user: Option<String>, password: Option<String>) -> Self {
        Self {
            user: user
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            password: password.map(Zeroizing::new),
        }
    }

    /// Log in and check that the stored role permits `operation`
    pub fn login_for(
        &self,
        storage: &Storage,
        settings: &Settings,
        operation: Operation,
    ) -> LedgerResult<Session> {
        let session = self.login(storage, settings)?;
        let user = UserService::new(storage).current_user(&session)?;
        require(user.role, operation)?;
        Ok(session)
    }

    /// Authenticate the supplied user
    pub fn login(&self, storage: &Storage, settings: &Settings) -> LedgerResult<Session> {
        let username = self.user.as_deref().ok_or_else(|| {
            LedgerError::Authorization(
                "not logged in; pass --user or set FUNDLEDGER_USER".into(),
            )
        })?;

        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_password(&format!("Password for {}: ", username))?,
        };

        UserService::with_params(storage, settings.password_hashing.clone())
            .authenticate(username, &password)
    }

    /// Password for a new account: the supplied one, or prompted twice
    pub fn new_password(&self) -> LedgerResult<Zeroizing<String>> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }

        let first = prompt_password("New password: ")?;
        let second = prompt_password("Confirm password: ")?;
        if first != second {
            return Err(LedgerError::Validation("Passwords do not match".into()));
        }
        Ok(first)
    }
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> LedgerResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| LedgerError::Io(format!("Failed to read password: {}", e)))
}
