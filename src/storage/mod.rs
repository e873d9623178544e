//! Storage layer
//!
//! One JSON file per entity type under the data directory, each loaded
//! into a [`Repository`] guarded by an `RwLock`.

pub mod file_io;
pub mod init;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{Record, Repository};

use crate::config::paths::PocketPaths;
use crate::error::PocketError;
use crate::models::{Account, Budget, Category, SavingsGoal, Transaction};

/// All repositories for one data directory
pub struct Storage {
    paths: PocketPaths,
    pub transactions: Repository<Transaction>,
    pub categories: Repository<Category>,
    pub accounts: Repository<Account>,
    pub goals: Repository<SavingsGoal>,
    pub budgets: Repository<Budget>,
}

impl Storage {
    /// Create repositories for `paths`; nothing is read until [`load_all`](Self::load_all)
    pub fn new(paths: PocketPaths) -> Result<Self, PocketError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: Repository::new(paths.transactions_file()),
            categories: Repository::new(paths.categories_file()),
            accounts: Repository::new(paths.accounts_file()),
            goals: Repository::new(paths.goals_file()),
            budgets: Repository::new(paths.budgets_file()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: PocketPaths) -> Result<Self, PocketError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &PocketPaths {
        &self.paths
    }

    pub fn load_all(&self) -> Result<(), PocketError> {
        self.transactions.load()?;
        self.categories.load()?;
        self.accounts.load()?;
        self.goals.load()?;
        self.budgets.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), PocketError> {
        self.transactions.save()?;
        self.categories.save()?;
        self.accounts.save()?;
        self.goals.save()?;
        self.budgets.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
