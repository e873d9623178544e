//! Account model
//!
//! Represents where money is held: cash, bank accounts, e-wallets, cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;
use super::transaction::Transaction;

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Cash,
    Bank,
    EWallet,
    CreditCard,
    Other,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "wallet" => Some(Self::Cash),
            "bank" | "checking" | "savings" => Some(Self::Bank),
            "ewallet" | "e_wallet" | "e-wallet" => Some(Self::EWallet),
            "credit" | "credit_card" | "creditcard" | "card" => Some(Self::CreditCard),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Bank => write!(f, "Bank"),
            Self::EWallet => write!(f, "E-Wallet"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A money account owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    pub owner_id: UserId,

    /// Account name (e.g., "BCA Savings")
    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Balance when the account was added
    pub initial_balance: Money,

    /// Archived accounts keep their history but accept no new transactions
    #[serde(default)]
    pub archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        account_type: AccountType,
        initial_balance: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            account_type,
            initial_balance,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Current balance from the initial balance and this account's transactions
    ///
    /// Transactions belonging to other accounts are ignored.
    pub fn balance<'a>(&self, transactions: impl IntoIterator<Item = &'a Transaction>) -> Money {
        self.initial_balance
            + transactions
                .into_iter()
                .filter(|t| t.account_id == self.id)
                .map(Transaction::balance_effect)
                .sum::<Money>()
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(AccountValidationError::NameTooLong(self.name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("Account name cannot be empty")]
    EmptyName,

    #[error("Account name too long ({0} chars, max 50)")]
    NameTooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn account() -> Account {
        Account::new(UserId::new(), "Wallet", AccountType::Cash, Money::from_cents(10000))
    }

    #[test]
    fn test_balance() {
        let account = account();
        let when = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let income = Transaction::new(
            account.owner_id,
            account.id,
            TransactionType::Income,
            Money::from_cents(5000),
            when,
        );
        let expense = Transaction::new(
            account.owner_id,
            account.id,
            TransactionType::Expense,
            Money::from_cents(2500),
            when,
        );
        let elsewhere = Transaction::new(
            account.owner_id,
            AccountId::new(),
            TransactionType::Expense,
            Money::from_cents(99900),
            when,
        );

        let txns = vec![income, expense, elsewhere];
        assert_eq!(account.balance(&txns), Money::from_cents(12500));
    }

    #[test]
    fn test_validation() {
        let mut account = account();
        assert!(account.validate().is_ok());

        account.name = "  ".into();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "a".repeat(51);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(AccountType::parse("e-wallet"), Some(AccountType::EWallet));
        assert_eq!(AccountType::parse("CARD"), Some(AccountType::CreditCard));
        assert_eq!(AccountType::parse("crypto"), None);
    }

    #[test]
    fn test_display() {
        let account = account();
        assert_eq!(format!("{}", account), "Wallet (Cash)");
    }
}
