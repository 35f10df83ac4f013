//! Storage initialization
//!
//! Handles first-run setup: settings, an empty ledger and an empty user table.

use crate::config::paths::LedgerPaths;
use crate::config::Settings;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;
use super::ledger::LedgerState;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running this twice is harmless.
pub fn initialize_storage(paths: &LedgerPaths, settings: &Settings) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    if !paths.ledger_file().exists() {
        write_json_atomic(paths.ledger_file(), &LedgerState::default())?;
    }

    if !paths.users_file().exists() {
        write_json_atomic(paths.users_file(), &serde_json::json!({ "users": [] }))?;
    }

    tracing::info!(base_dir = %paths.base_dir().display(), "storage initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::read_json;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(!paths.is_initialized());

        initialize_storage(&paths, &Settings::default()).unwrap();

        assert!(paths.is_initialized());
        assert!(paths.ledger_file().exists());
        assert!(paths.users_file().exists());

        let state: LedgerState = read_json(paths.ledger_file()).unwrap();
        assert!(state.balance().is_zero());
        assert!(state.income.is_empty());
    }

    #[test]
    fn test_initialize_keeps_existing_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut custom = Settings::default();
        custom.currency_symbol = "$".into();
        initialize_storage(&paths, &custom).unwrap();
        initialize_storage(&paths, &Settings::default()).unwrap();

        assert_eq!(Settings::load_or_create(&paths).unwrap().currency_symbol, "$");
    }
}
