//! Account service
//!
//! Account CRUD scoped to one user, plus balances computed from the
//! transaction log.

use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{Account, AccountId, AccountType, Money, UserId};
use crate::storage::Storage;
use crate::validation::{validate_name, FormValidation};

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
    user: UserId,
}

/// An account with its current balance
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    pub balance: Money,
    pub transaction_count: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        initial_balance: Money,
    ) -> PocketResult<Account> {
        FormValidation::new()
            .check("name", validate_name(name))
            .ensure_valid()?;
        let name = name.trim();

        if self.get_by_name(name)?.is_some() {
            return Err(PocketError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::new(self.user, name, account_type, initial_balance);
        account
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.accounts.insert(account.clone())?;
        self.storage.accounts.save()?;

        info!(account = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Get one of the user's accounts
    pub fn get(&self, id: AccountId) -> PocketResult<Option<Account>> {
        Ok(self
            .storage
            .accounts
            .get(id)?
            .filter(|a| a.owner_id == self.user))
    }

    pub fn get_by_name(&self, name: &str) -> PocketResult<Option<Account>> {
        let name = name.trim();
        self.storage
            .accounts
            .find(|a| a.owner_id == self.user && a.name.eq_ignore_ascii_case(name))
    }

    /// Find an account by short id or name
    pub fn find(&self, identifier: &str) -> PocketResult<Option<Account>> {
        if let Some(account) = self
            .storage
            .accounts
            .find(|a| a.owner_id == self.user && a.id.matches(identifier))?
        {
            return Ok(Some(account));
        }
        self.get_by_name(identifier)
    }

    pub fn require(&self, id: AccountId) -> PocketResult<Account> {
        self.get(id)?
            .ok_or_else(|| PocketError::account_not_found(id.to_string()))
    }

    /// An account that can take new transactions
    pub fn require_active(&self, id: AccountId) -> PocketResult<Account> {
        let account = self.require(id)?;
        if account.archived {
            return Err(PocketError::Validation(format!(
                "Account '{}' is archived",
                account.name
            )));
        }
        Ok(account)
    }

    pub fn list(&self, include_archived: bool) -> PocketResult<Vec<Account>> {
        self.storage
            .accounts
            .filter(|a| a.owner_id == self.user && (include_archived || !a.archived))
    }

    pub fn list_with_balances(&self, include_archived: bool) -> PocketResult<Vec<AccountSummary>> {
        self.list(include_archived)?
            .into_iter()
            .map(|account| self.summary(account))
            .collect()
    }

    pub fn summary(&self, account: Account) -> PocketResult<AccountSummary> {
        let transactions = self
            .storage
            .transactions
            .filter(|t| t.account_id == account.id)?;

        Ok(AccountSummary {
            balance: account.balance(&transactions),
            transaction_count: transactions.len(),
            account,
        })
    }

    pub fn balance(&self, id: AccountId) -> PocketResult<Money> {
        Ok(self.summary(self.require(id)?)?.balance)
    }

    /// Sum of balances across active accounts
    pub fn total_balance(&self) -> PocketResult<Money> {
        Ok(self
            .list_with_balances(false)?
            .iter()
            .map(|s| s.balance)
            .sum())
    }

    pub fn archive(&self, id: AccountId) -> PocketResult<Account> {
        let mut account = self.require(id)?;
        account.archive();
        self.storage.accounts.update(account.clone())?;
        self.storage.accounts.save()?;

        info!(account = %account.id, "account archived");
        Ok(account)
    }

    /// Delete an account that has no transactions
    pub fn delete(&self, id: AccountId) -> PocketResult<Account> {
        let summary = self.summary(self.require(id)?)?;
        if summary.transaction_count > 0 {
            return Err(PocketError::Validation(format!(
                "Account '{}' has {} transactions; archive it instead",
                summary.account.name, summary.transaction_count
            )));
        }

        self.storage.accounts.delete(id)?;
        self.storage.accounts.save()?;

        info!(account = %id, "account deleted");
        Ok(summary.account)
    }
}
