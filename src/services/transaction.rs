//! Transaction service
//!
//! Creates, edits, lists and deletes transactions for one user. Transfers
//! are created through [`TransferService`](super::TransferService) but
//! editing or deleting either leg here keeps the pair in step.

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::error::{PocketError, PocketResult};
use crate::models::{
    AccountId, CategoryId, CategoryType, DateRange, LineItem, Money, SavingsGoalId, ScanResult,
    Transaction, TransactionId, TransactionType, UserId,
};
use crate::storage::Storage;

use super::{AccountService, CategoryService, SavingsGoalService};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    user: UserId,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub range: Option<DateRange>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.account_id == id)
            && self.category_id.map_or(true, |id| txn.category_id == Some(id))
            && self
                .transaction_type
                .map_or(true, |kind| txn.transaction_type == kind)
            && self.range.map_or(true, |range| range.contains(txn.date()))
    }
}

/// Input for creating an expense, income or savings transaction
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionInput {
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date_time: NaiveDateTime,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub savings_goal_id: Option<SavingsGoalId>,
    pub receipt_image: Option<String>,
    pub line_items: Vec<LineItem>,
}

impl CreateTransactionInput {
    pub fn new(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Money,
        date_time: NaiveDateTime,
    ) -> Self {
        Self {
            account_id,
            transaction_type,
            amount,
            date_time,
            description: String::new(),
            category_id: None,
            savings_goal_id: None,
            receipt_image: None,
            line_items: Vec::new(),
        }
    }
}

/// Fields to change on an existing transaction; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub date_time: Option<NaiveDateTime>,
    pub description: Option<String>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<CategoryId>>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    pub fn create(&self, input: CreateTransactionInput) -> PocketResult<Transaction> {
        if input.transaction_type == TransactionType::Transfer {
            return Err(PocketError::Validation(
                "Use a transfer to move money between accounts".into(),
            ));
        }

        AccountService::new(self.storage, self.user).require_active(input.account_id)?;
        if let Some(category_id) = input.category_id {
            self.check_category(category_id, input.transaction_type)?;
        }
        if let Some(goal_id) = input.savings_goal_id {
            SavingsGoalService::new(self.storage, self.user).require(goal_id)?;
        }

        let mut txn = Transaction::new(
            self.user,
            input.account_id,
            input.transaction_type,
            input.amount,
            input.date_time,
        );
        txn.description = input.description.trim().to_string();
        txn.category_id = input.category_id;
        txn.savings_goal_id = input.savings_goal_id;
        txn.receipt_image = input.receipt_image;
        txn.line_items = input.line_items;

        txn.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.transactions.insert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            transaction = %txn.id,
            kind = %txn.transaction_type,
            amount = %txn.amount,
            items = txn.line_items.len(),
            "transaction created"
        );
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> PocketResult<Option<Transaction>> {
        Ok(self
            .storage
            .transactions
            .get(id)?
            .filter(|t| t.owner_id == self.user))
    }

    pub fn require(&self, id: TransactionId) -> PocketResult<Transaction> {
        self.get(id)?
            .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))
    }

    /// Find a transaction by full or short id
    pub fn find(&self, identifier: &str) -> PocketResult<Option<Transaction>> {
        self.storage
            .transactions
            .find(|t| t.owner_id == self.user && t.id.matches(identifier))
    }

    /// Matching transactions, newest first
    pub fn list(&self, filter: &TransactionFilter) -> PocketResult<Vec<Transaction>> {
        let mut transactions = self
            .storage
            .transactions
            .filter(|t| t.owner_id == self.user && filter.matches(t))?;

        transactions.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// All of the user's transactions in stored order
    pub fn snapshot(&self) -> PocketResult<Vec<Transaction>> {
        self.storage.transactions.get_by_owner(self.user)
    }

    /// Apply an edit; amount and date changes on a transfer also move its pair
    pub fn update(&self, id: TransactionId, update: TransactionUpdate) -> PocketResult<Transaction> {
        let mut txn = self.require(id)?;

        if let Some(category_id) = update.category_id {
            if let Some(category_id) = category_id {
                self.check_category(category_id, txn.transaction_type)?;
            }
            txn.category_id = category_id;
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(date_time) = update.date_time {
            txn.date_time = date_time;
        }
        if let Some(description) = update.description {
            txn.description = description.trim().to_string();
        }
        txn.updated_at = Utc::now();

        txn.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        let pair = match txn.transfer_pair_id {
            Some(pair_id) => {
                let mut pair = self.require(pair_id)?;
                pair.amount = txn.amount;
                pair.date_time = txn.date_time;
                pair.updated_at = txn.updated_at;
                Some(pair)
            }
            None => None,
        };

        self.storage.transactions.update(txn.clone())?;
        if let Some(pair) = pair {
            self.storage.transactions.update(pair)?;
        }
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, "transaction updated");
        Ok(txn)
    }

    /// Delete a transaction and, for transfers, its mirrored leg
    ///
    /// Returns the ids removed.
    pub fn delete(&self, id: TransactionId) -> PocketResult<Vec<TransactionId>> {
        let txn = self.require(id)?;
        let mut removed = vec![txn.id];

        self.storage.transactions.delete(txn.id)?;
        if let Some(pair_id) = txn.transfer_pair_id {
            if self.storage.transactions.delete(pair_id)? {
                removed.push(pair_id);
            } else {
                debug!(transaction = %txn.id, pair = %pair_id, "transfer pair already gone");
            }
        }
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, removed = removed.len(), "transaction deleted");
        Ok(removed)
    }

    /// Pre-fill a new expense from a receipt scan
    ///
    /// Nothing is stored; the caller reviews the draft and passes it to
    /// [`create`](Self::create). The category key is resolved to the
    /// matching built-in category when there is one.
    pub fn draft_from_scan(
        &self,
        scan: &ScanResult,
        account_id: AccountId,
    ) -> PocketResult<CreateTransactionInput> {
        let category_id = match scan.category_key.as_deref() {
            Some(key) => CategoryService::new(self.storage, self.user)
                .find_by_standard_key(key)?
                .map(|c| c.id),
            None => None,
        };

        Ok(CreateTransactionInput {
            account_id,
            transaction_type: TransactionType::Expense,
            amount: scan.total_amount,
            date_time: scan.date_time,
            description: scan.merchant_name.clone().unwrap_or_default(),
            category_id,
            savings_goal_id: None,
            receipt_image: scan.receipt_image.clone(),
            line_items: scan.line_items.clone(),
        })
    }

    fn check_category(
        &self,
        category_id: CategoryId,
        transaction_type: TransactionType,
    ) -> PocketResult<()> {
        let category = CategoryService::new(self.storage, self.user).require(category_id)?;

        let expected = match transaction_type {
            TransactionType::Expense => CategoryType::Expense,
            TransactionType::Income => CategoryType::Income,
            TransactionType::Savings | TransactionType::Transfer => {
                return Err(PocketError::Validation(format!(
                    "{} transactions are not categorized",
                    transaction_type
                )))
            }
        };

        if category.category_type != expected {
            return Err(PocketError::Validation(format!(
                "Category '{}' cannot be used for {} transactions",
                category.name,
                transaction_type.to_string().to_lowercase()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PocketPaths;
    use crate::models::{Account, AccountType};
    use crate::services::TransferService;
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn setup_account(storage: &Storage, user: UserId, name: &str) -> AccountId {
        let account = Account::new(user, name, AccountType::Cash, Money::zero());
        let id = account.id;
        storage.accounts.insert(account).unwrap();
        id
    }

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn expense(account_id: AccountId, cents: i64, when: NaiveDateTime) -> CreateTransactionInput {
        CreateTransactionInput::new(
            account_id,
            TransactionType::Expense,
            Money::from_cents(cents),
            when,
        )
    }

    #[test]
    fn test_create_itemised_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let account_id = setup_account(&storage, user, "Wallet");
        let service = TransactionService::new(&storage, user);

        let mut input = expense(account_id, 50000, at(1, 5));
        input.line_items = vec![LineItem::new("Soap", 2, Money::from_cents(1000))];
        let txn = service.create(input).unwrap();

        assert_eq!(txn.amount, Money::from_cents(50000));
        assert_eq!(txn.line_items[0].total(), Money::from_cents(2000));
        assert_eq!(service.require(txn.id).unwrap().line_items.len(), 1);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let account_id = setup_account(&storage, user, "Wallet");
        let service = TransactionService::new(&storage, user);

        assert!(service
            .create(expense(account_id, 0, at(1, 1)))
            .unwrap_err()
            .is_validation());

        assert!(service
            .create(expense(AccountId::new(), 100, at(1, 1)))
            .unwrap_err()
            .is_not_found());

        let mut savings = expense(account_id, 100, at(1, 1));
        savings.transaction_type = TransactionType::Savings;
        assert!(service.create(savings).unwrap_err().is_validation());
    }

    #[test]
    fn test_category_type_must_match() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let account_id = setup_account(&storage, user, "Wallet");
        let service = TransactionService::new(&storage, user);
        let salary = CategoryService::new(&storage, user)
            .find_by_standard_key("salary")
            .unwrap()
            .unwrap();

        let mut input = expense(account_id, 100, at(1, 1));
        input.category_id = Some(salary.id);
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_other_users_cannot_see_or_use() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = UserId::new();
        let bob = UserId::new();
        let alice_account = setup_account(&storage, alice, "Wallet");

        let txn = TransactionService::new(&storage, alice)
            .create(expense(alice_account, 100, at(1, 1)))
            .unwrap();

        let bob_service = TransactionService::new(&storage, bob);
        assert!(bob_service.get(txn.id).unwrap().is_none());
        assert!(bob_service.delete(txn.id).unwrap_err().is_not_found());
        assert!(bob_service
            .create(expense(alice_account, 100, at(1, 1)))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_list_filters_and_order() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let wallet = setup_account(&storage, user, "Wallet");
        let bank = setup_account(&storage, user, "Bank");
        let service = TransactionService::new(&storage, user);

        service.create(expense(wallet, 100, at(1, 1))).unwrap();
        service.create(expense(wallet, 200, at(2, 1))).unwrap();
        service.create(expense(bank, 300, at(1, 15))).unwrap();

        let all = service.list(&TransactionFilter::new()).unwrap();
        let amounts: Vec<_> = all.iter().map(|t| t.amount.cents()).collect();
        assert_eq!(amounts, vec![200, 300, 100]);

        let january = crate::models::Month::new(2025, 1).unwrap().range();
        let filtered = service
            .list(&TransactionFilter::new().account(wallet).range(january))
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, Money::from_cents(100));

        assert_eq!(service.list(&TransactionFilter::new().limit(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_update_and_clear_category() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let account_id = setup_account(&storage, user, "Wallet");
        let service = TransactionService::new(&storage, user);
        let food = CategoryService::new(&storage, user)
            .find_by_standard_key("food_drink")
            .unwrap()
            .unwrap();

        let txn = service.create(expense(account_id, 100, at(1, 1))).unwrap();
        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    amount: Some(Money::from_cents(150)),
                    category_id: Some(Some(food.id)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_cents(150));
        assert_eq!(updated.category_id, Some(food.id));

        let cleared = service
            .update(
                txn.id,
                TransactionUpdate {
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.category_id, None);
    }

    #[test]
    fn test_transfer_edit_and_delete_follow_pair() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let wallet = setup_account(&storage, user, "Wallet");
        let bank = setup_account(&storage, user, "Bank");
        let service = TransactionService::new(&storage, user);

        let transfer = TransferService::new(&storage, user)
            .create_transfer(bank, wallet, Money::from_cents(5000), at(3, 1), None)
            .unwrap();

        service
            .update(
                transfer.to_transaction.id,
                TransactionUpdate {
                    amount: Some(Money::from_cents(6000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            service.require(transfer.from_transaction.id).unwrap().amount,
            Money::from_cents(6000)
        );

        let removed = service.delete(transfer.from_transaction.id).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(service.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_draft_from_scan() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let account_id = setup_account(&storage, user, "Wallet");
        let service = TransactionService::new(&storage, user);

        let scan = ScanResult {
            merchant_name: Some("Cafe Luna".into()),
            date_time: at(4, 2),
            total_amount: Money::from_cents(4200),
            category_key: Some("food_drink".into()),
            line_items: vec![LineItem::new("Latte", 2, Money::from_cents(2100))],
            receipt_image: Some("/tmp/luna.jpg".into()),
        };

        let draft = service.draft_from_scan(&scan, account_id).unwrap();
        assert_eq!(draft.transaction_type, TransactionType::Expense);
        assert_eq!(draft.description, "Cafe Luna");
        assert!(draft.category_id.is_some());
        // Drafts are not stored
        assert!(service.snapshot().unwrap().is_empty());

        let txn = service.create(draft).unwrap();
        assert_eq!(txn.receipt_image.as_deref(), Some("/tmp/luna.jpg"));
        assert_eq!(txn.line_items_total(), Money::from_cents(4200));
    }
}
