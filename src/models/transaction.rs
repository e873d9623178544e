//! Transaction model
//!
//! A transaction records one money movement. The amount is always a positive
//! magnitude; its direction comes from [`TransactionType`]. Itemised receipts
//! are kept as [`LineItem`]s owned by the transaction.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, SavingsGoalId, TransactionId, UserId};
use super::money::Money;

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
    /// Contribution toward a savings goal
    Savings,
    /// One leg of a transfer between two accounts
    Transfer,
}

impl TransactionType {
    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "out" => Some(Self::Expense),
            "income" | "in" => Some(Self::Income),
            "savings" | "saving" => Some(Self::Savings),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
            Self::Savings => write!(f, "Savings"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// Which side of a transfer a leg sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    /// Money leaves this leg's account
    Outgoing,
    /// Money arrives in this leg's account
    Incoming,
}

/// One line of an itemised receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,

    /// Number of units, must be positive
    pub quantity: u32,

    /// Price of a single unit
    pub price: Money,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: Money) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// price × quantity, clamped instead of overflowing
    pub fn total(&self) -> Money {
        self.price.saturating_times(self.quantity)
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user who recorded this transaction
    pub owner_id: UserId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// Amount, always greater than zero
    pub amount: Money,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// When the money moved (local time)
    pub date_time: NaiveDateTime,

    #[serde(default)]
    pub description: String,

    /// Category (None for transfers and uncategorized entries)
    pub category_id: Option<CategoryId>,

    /// Savings goal this contribution counts toward
    #[serde(default)]
    pub savings_goal_id: Option<SavingsGoalId>,

    /// If this is a transfer leg, the id of the mirrored leg
    #[serde(default)]
    pub transfer_pair_id: Option<TransactionId>,

    #[serde(default)]
    pub transfer_direction: Option<TransferDirection>,

    /// Path or URI of the scanned receipt image
    #[serde(default)]
    pub receipt_image: Option<String>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        owner_id: UserId,
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Money,
        date_time: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner_id,
            account_id,
            amount,
            transaction_type,
            date_time,
            description: String::new(),
            category_id: None,
            savings_goal_id: None,
            transfer_pair_id: None,
            transfer_direction: None,
            receipt_image: None,
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar date of the transaction
    pub fn date(&self) -> NaiveDate {
        self.date_time.date()
    }

    pub fn is_transfer(&self) -> bool {
        self.transaction_type == TransactionType::Transfer
    }

    /// Signed effect of this transaction on its account balance
    pub fn balance_effect(&self) -> Money {
        match (self.transaction_type, self.transfer_direction) {
            (TransactionType::Income, _) => self.amount,
            (TransactionType::Transfer, Some(TransferDirection::Incoming)) => self.amount,
            _ => -self.amount,
        }
    }

    pub fn is_itemised(&self) -> bool {
        !self.line_items.is_empty()
    }

    /// Sum of all line item totals
    pub fn line_items_total(&self) -> Money {
        self.line_items.iter().map(LineItem::total).sum()
    }

    /// Set the category
    pub fn set_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
        self.updated_at = Utc::now();
    }

    /// Replace the line items
    pub fn set_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = items;
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        match self.transaction_type {
            TransactionType::Transfer => {
                if self.transfer_pair_id.is_none() || self.transfer_direction.is_none() {
                    return Err(TransactionValidationError::UnpairedTransfer);
                }
                if self.category_id.is_some() {
                    return Err(TransactionValidationError::TransferWithCategory);
                }
            }
            _ if self.transfer_pair_id.is_some() || self.transfer_direction.is_some() => {
                return Err(TransactionValidationError::PairOnNonTransfer);
            }
            TransactionType::Savings if self.savings_goal_id.is_none() => {
                return Err(TransactionValidationError::SavingsWithoutGoal);
            }
            _ => {}
        }

        for item in &self.line_items {
            if item.name.trim().is_empty() {
                return Err(TransactionValidationError::UnnamedLineItem);
            }
            if item.quantity == 0 {
                return Err(TransactionValidationError::ZeroQuantity(item.name.clone()));
            }
            if item.price.is_negative() {
                return Err(TransactionValidationError::NegativePrice(item.name.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date_time.format("%Y-%m-%d %H:%M"),
            self.transaction_type,
            self.description,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionValidationError {
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Money),

    #[error("Transfer is missing its paired transaction")]
    UnpairedTransfer,

    #[error("Transfer transactions should not have a category")]
    TransferWithCategory,

    #[error("Only transfers can be linked to a paired transaction")]
    PairOnNonTransfer,

    #[error("Savings transactions must be linked to a savings goal")]
    SavingsWithoutGoal,

    #[error("Line items must have a name")]
    UnnamedLineItem,

    #[error("Line item '{0}' must have a quantity of at least 1")]
    ZeroQuantity(String),

    #[error("Line item '{0}' cannot have a negative price")]
    NegativePrice(String),
}
