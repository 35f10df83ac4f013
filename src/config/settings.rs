//! User settings for FundLedger
//!
//! Manages display preferences, report defaults, the ledger lock timeout and
//! password hashing cost.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::auth::PasswordParams;
use crate::error::LedgerError;

/// Settings for FundLedger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Organization shown in report headers
    #[serde(default = "default_organization")]
    pub organization_name: String,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Title used for PDF summary reports when none is given
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// How long a posting waits for the ledger lock before failing
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Argon2id cost for newly hashed passwords
    #[serde(default)]
    pub password_hashing: PasswordParams,
}

fn default_schema_version() -> u32 {
    1
}

fn default_organization() -> String {
    "University Funds Management".to_string()
}

fn default_currency() -> String {
    "Rs.".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_report_title() -> String {
    "University Financial Report".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            organization_name: default_organization(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            report_title: default_report_title(),
            lock_timeout_ms: default_lock_timeout_ms(),
            password_hashing: PasswordParams::default(),
        }
    }
}

impl Settings {
    /// Lock timeout as a `Duration`
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "Rs.");
        assert_eq!(settings.report_title, "University Financial Report");
        assert_eq!(settings.lock_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.lock_timeout_ms = 250;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.lock_timeout_ms, 250);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "$"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.organization_name, "University Funds Management");
        assert_eq!(loaded.password_hashing, PasswordParams::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(LedgerError::Config(_))
        ));
    }
}
