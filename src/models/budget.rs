//! Budget model
//!
//! A budget caps spending in one category over a date range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::period::DateRange;
use super::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub owner_id: UserId,
    pub category_id: CategoryId,

    /// Maximum planned spending for the range
    pub limit: Money,

    pub period: DateRange,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Spending measured against a budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    pub limit: Money,
    pub spent: Money,
    /// limit - spent; negative when overspent
    pub remaining: Money,
    pub percentage_used: f64,
}

impl BudgetStatus {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

impl Budget {
    pub fn new(owner_id: UserId, category_id: CategoryId, limit: Money, period: DateRange) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            owner_id,
            category_id,
            limit,
            period,
            created_at: now,
            updated_at: now,
        }
    }

    /// Expense transactions of this budget's category inside its range
    pub fn status<'a>(&self, transactions: impl IntoIterator<Item = &'a Transaction>) -> BudgetStatus {
        let spent: Money = transactions
            .into_iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Expense
                    && t.category_id == Some(self.category_id)
                    && self.period.contains(t.date())
            })
            .map(|t| t.amount)
            .sum();

        BudgetStatus {
            limit: self.limit,
            spent,
            remaining: self.limit - spent,
            percentage_used: spent.percentage_of(self.limit),
        }
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.limit.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetValidationError {
    #[error("Budget limit must be greater than zero")]
    NonPositiveLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Month};
    use chrono::NaiveDate;

    fn spend(owner: UserId, category: CategoryId, cents: i64, day: u32) -> Transaction {
        let mut txn = Transaction::new(
            owner,
            AccountId::new(),
            TransactionType::Expense,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 5, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        );
        txn.category_id = Some(category);
        txn
    }

    #[test]
    fn test_status() {
        let owner = UserId::new();
        let category = CategoryId::new();
        let period = Month::new(2025, 5).unwrap().range();
        let budget = Budget::new(owner, category, Money::from_cents(10000), period);

        let txns = vec![
            spend(owner, category, 4000, 2),
            spend(owner, category, 3000, 31),
            spend(owner, CategoryId::new(), 9999, 3),
        ];

        let status = budget.status(&txns);
        assert_eq!(status.spent, Money::from_cents(7000));
        assert_eq!(status.remaining, Money::from_cents(3000));
        assert_eq!(status.percentage_used, 70.0);
        assert!(!status.is_over_budget());
    }

    #[test]
    fn test_over_budget() {
        let owner = UserId::new();
        let category = CategoryId::new();
        let period = Month::new(2025, 5).unwrap().range();
        let budget = Budget::new(owner, category, Money::from_cents(1000), period);

        let status = budget.status(&[spend(owner, category, 1500, 10)]);
        assert!(status.is_over_budget());
        assert_eq!(status.remaining, Money::from_cents(-500));
    }

    #[test]
    fn test_validation() {
        let budget = Budget::new(
            UserId::new(),
            CategoryId::new(),
            Money::zero(),
            Month::new(2025, 1).unwrap().range(),
        );
        assert_eq!(budget.validate(), Err(BudgetValidationError::NonPositiveLimit));
    }
}
