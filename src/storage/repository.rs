//! Generic JSON-backed repository
//!
//! One repository per entity file. Records are kept in insertion order so
//! listings and reports see them in the order they were created.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::PocketError;
use crate::models::{
    Account, AccountId, Budget, BudgetId, Category, CategoryId, SavingsGoal, SavingsGoalId,
    Transaction, TransactionId, UserId,
};

use super::file_io::{read_json, write_json_atomic};

/// An entity stored by a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Display;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Owning user; `None` for shared records such as built-in categories
    fn owner(&self) -> Option<UserId>;
}

macro_rules! impl_record {
    ($type:ty, $id:ty, $entity:literal, |$r:ident| $owner:expr) => {
        impl Record for $type {
            type Id = $id;
            const ENTITY: &'static str = $entity;

            fn id(&self) -> $id {
                self.id
            }

            fn owner(&self) -> Option<UserId> {
                let $r = self;
                $owner
            }
        }
    };
}

impl_record!(Transaction, TransactionId, "Transaction", |r| Some(r.owner_id));
impl_record!(Account, AccountId, "Account", |r| Some(r.owner_id));
impl_record!(SavingsGoal, SavingsGoalId, "Savings goal", |r| Some(r.owner_id));
impl_record!(Budget, BudgetId, "Budget", |r| Some(r.owner_id));
impl_record!(Category, CategoryId, "Category", |r| r.owner_id);

/// Repository for one entity type persisted as a JSON array
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, PocketError> {
        self.data
            .read()
            .map_err(|e| PocketError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, PocketError> {
        self.data
            .write()
            .map_err(|e| PocketError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace in-memory state with the file contents
    pub fn load(&self) -> Result<(), PocketError> {
        let records: Vec<T> = read_json(&self.path)?;
        debug!(entity = T::ENTITY, count = records.len(), "loaded");
        *self.write()? = records;
        Ok(())
    }

    pub fn save(&self) -> Result<(), PocketError> {
        let data = self.read()?;
        write_json_atomic(&self.path, &*data)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, PocketError> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    /// Like [`get`](Self::get) but missing records are an error
    pub fn require(&self, id: T::Id) -> Result<T, PocketError> {
        self.get(id)?.ok_or_else(|| PocketError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        })
    }

    pub fn get_all(&self) -> Result<Vec<T>, PocketError> {
        Ok(self.read()?.clone())
    }

    /// Records owned by `user`
    pub fn get_by_owner(&self, user: UserId) -> Result<Vec<T>, PocketError> {
        self.filter(|r| r.owner() == Some(user))
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>, PocketError> {
        Ok(self.read()?.iter().filter(|r| predicate(r)).cloned().collect())
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>, PocketError> {
        Ok(self.read()?.iter().find(|r| predicate(r)).cloned())
    }

    /// Add a new record, rejecting duplicate ids
    pub fn insert(&self, record: T) -> Result<(), PocketError> {
        let mut data = self.write()?;
        if data.iter().any(|r| r.id() == record.id()) {
            return Err(PocketError::Duplicate {
                entity_type: T::ENTITY,
                identifier: record.id().to_string(),
            });
        }
        data.push(record);
        Ok(())
    }

    /// Replace an existing record in place
    pub fn update(&self, record: T) -> Result<(), PocketError> {
        let mut data = self.write()?;
        let slot = data
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| PocketError::NotFound {
                entity_type: T::ENTITY,
                identifier: record.id().to_string(),
            })?;
        *slot = record;
        Ok(())
    }

    /// Remove a record; returns whether it existed
    pub fn delete(&self, id: T::Id) -> Result<bool, PocketError> {
        let mut data = self.write()?;
        let before = data.len();
        data.retain(|r| r.id() != id);
        Ok(data.len() != before)
    }

    pub fn count(&self) -> Result<usize, PocketError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Money};
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> Repository<Account> {
        Repository::new(dir.path().join("accounts.json"))
    }

    fn account(owner: UserId, name: &str) -> Account {
        Account::new(owner, name, AccountType::Cash, Money::zero())
    }

    #[test]
    fn test_insert_get_and_order() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let user = UserId::new();

        let wallet = account(user, "Wallet");
        let bank = account(user, "Bank");
        repo.insert(wallet.clone()).unwrap();
        repo.insert(bank.clone()).unwrap();

        assert_eq!(repo.get(bank.id).unwrap().unwrap().name, "Bank");
        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Wallet", "Bank"]);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let wallet = account(UserId::new(), "Wallet");

        repo.insert(wallet.clone()).unwrap();
        assert!(matches!(
            repo.insert(wallet),
            Err(PocketError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let mut wallet = account(UserId::new(), "Wallet");
        repo.insert(wallet.clone()).unwrap();

        wallet.name = "Pocket".into();
        repo.update(wallet.clone()).unwrap();
        assert_eq!(repo.require(wallet.id).unwrap().name, "Pocket");

        assert!(repo.delete(wallet.id).unwrap());
        assert!(!repo.delete(wallet.id).unwrap());
        assert!(repo.require(wallet.id).unwrap_err().is_not_found());
        assert!(repo.update(wallet).unwrap_err().is_not_found());
    }

    #[test]
    fn test_owner_scoping() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let alice = UserId::new();
        let bob = UserId::new();
        repo.insert(account(alice, "A")).unwrap();
        repo.insert(account(bob, "B")).unwrap();

        let mine = repo.get_by_owner(alice).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "A");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let user = UserId::new();
        {
            let repo = repo(&dir);
            repo.insert(account(user, "Wallet")).unwrap();
            repo.save().unwrap();
        }

        let repo = repo(&dir);
        assert_eq!(repo.count().unwrap(), 0);
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }
}
