//! Transfer service
//!
//! A transfer is two linked transactions: an outgoing leg on the source
//! account and an incoming leg on the destination. Both carry the same
//! amount and date and point at each other through `transfer_pair_id`.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{
    AccountId, Money, Transaction, TransactionId, TransactionType, TransferDirection, UserId,
};
use crate::storage::Storage;

use super::AccountService;

pub struct TransferService<'a> {
    storage: &'a Storage,
    user: UserId,
}

/// Both legs of a transfer
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub from_transaction: Transaction,
    pub to_transaction: Transaction,
}

impl<'a> TransferService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    pub fn create_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
        date_time: NaiveDateTime,
        description: Option<String>,
    ) -> PocketResult<TransferResult> {
        if from_account_id == to_account_id {
            return Err(PocketError::Validation(
                "Cannot transfer to the same account".into(),
            ));
        }

        let accounts = AccountService::new(self.storage, self.user);
        let from_account = accounts.require_active(from_account_id)?;
        let to_account = accounts.require_active(to_account_id)?;

        let mut from_txn = Transaction::new(
            self.user,
            from_account_id,
            TransactionType::Transfer,
            amount,
            date_time,
        );
        let mut to_txn = Transaction::new(
            self.user,
            to_account_id,
            TransactionType::Transfer,
            amount,
            date_time,
        );

        from_txn.description = description
            .clone()
            .unwrap_or_else(|| format!("Transfer to {}", to_account.name));
        to_txn.description =
            description.unwrap_or_else(|| format!("Transfer from {}", from_account.name));

        from_txn.transfer_direction = Some(TransferDirection::Outgoing);
        to_txn.transfer_direction = Some(TransferDirection::Incoming);
        from_txn.transfer_pair_id = Some(to_txn.id);
        to_txn.transfer_pair_id = Some(from_txn.id);

        for txn in [&from_txn, &to_txn] {
            txn.validate()
                .map_err(|e| PocketError::Validation(e.to_string()))?;
        }

        self.storage.transactions.insert(from_txn.clone())?;
        self.storage.transactions.insert(to_txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            from = %from_account.name,
            to = %to_account.name,
            amount = %amount,
            "transfer created"
        );
        Ok(TransferResult {
            from_transaction: from_txn,
            to_transaction: to_txn,
        })
    }

    /// The other leg of a transfer
    pub fn get_linked_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> PocketResult<Option<Transaction>> {
        let txn = self
            .storage
            .transactions
            .get(transaction_id)?
            .filter(|t| t.owner_id == self.user)
            .ok_or_else(|| PocketError::transaction_not_found(transaction_id.to_string()))?;

        match txn.transfer_pair_id {
            Some(pair_id) => self.storage.transactions.get(pair_id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PocketPaths;
    use crate::models::{Account, AccountType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn setup_test_accounts(storage: &Storage, user: UserId) -> (AccountId, AccountId) {
        let bank = Account::new(user, "Bank", AccountType::Bank, Money::from_cents(100000));
        let wallet = Account::new(user, "Wallet", AccountType::Cash, Money::zero());
        let ids = (bank.id, wallet.id);
        storage.accounts.insert(bank).unwrap();
        storage.accounts.insert(wallet).unwrap();
        ids
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_create_transfer() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let (bank, wallet) = setup_test_accounts(&storage, user);
        let service = TransferService::new(&storage, user);

        let result = service
            .create_transfer(bank, wallet, Money::from_cents(20000), noon(), None)
            .unwrap();

        assert_eq!(result.from_transaction.transfer_pair_id, Some(result.to_transaction.id));
        assert_eq!(result.to_transaction.transfer_pair_id, Some(result.from_transaction.id));
        assert_eq!(result.from_transaction.description, "Transfer to Wallet");
        assert_eq!(result.to_transaction.description, "Transfer from Bank");

        let accounts = AccountService::new(&storage, user);
        assert_eq!(accounts.balance(bank).unwrap(), Money::from_cents(80000));
        assert_eq!(accounts.balance(wallet).unwrap(), Money::from_cents(20000));
    }

    #[test]
    fn test_transfer_to_same_account_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let (bank, _) = setup_test_accounts(&storage, user);

        let err = TransferService::new(&storage, user)
            .create_transfer(bank, bank, Money::from_cents(100), noon(), None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_transfer_zero_amount_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let (bank, wallet) = setup_test_accounts(&storage, user);

        let err = TransferService::new(&storage, user)
            .create_transfer(bank, wallet, Money::zero(), noon(), None)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_get_linked_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let (bank, wallet) = setup_test_accounts(&storage, user);
        let service = TransferService::new(&storage, user);

        let result = service
            .create_transfer(bank, wallet, Money::from_cents(100), noon(), Some("Top up".into()))
            .unwrap();
        let linked = service
            .get_linked_transaction(result.from_transaction.id)
            .unwrap()
            .unwrap();
        assert_eq!(linked.id, result.to_transaction.id);
        assert_eq!(linked.description, "Top up");
    }
}
