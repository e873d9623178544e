//! Path management for pocket-ledger
//!
//! ## Path Resolution Order
//!
//! 1. `POCKET_LEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `pocket-ledger`
//!    (`~/.config/pocket-ledger` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::PocketError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "POCKET_LEDGER_DATA_DIR";

/// Every file location used by the ledger
#[derive(Debug, Clone)]
pub struct PocketPaths {
    base_dir: PathBuf,
}

impl PocketPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PocketError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "pocket-ledger")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| PocketError::Config("Could not determine home directory".into()))?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), PocketError> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PocketError::Io(format!("Failed to create data directory: {}", e)))
    }

    /// True once `pocket init` has written the settings file
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.goals_file(),
            temp_dir.path().join("data").join("goals.json")
        );
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = PocketPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
    }
}
