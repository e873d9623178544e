//! Savings goal model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{SavingsGoalId, UserId};
use super::money::Money;
use super::transaction::{Transaction, TransactionType};

/// A target amount the user saves toward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: SavingsGoalId,
    pub owner_id: UserId,
    pub name: String,
    pub target_amount: Money,

    /// Optional deadline
    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How far along a goal is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub saved: Money,
    pub remaining: Money,
    /// 0-100, capped at 100
    pub percentage: f64,
    pub reached: bool,
}

impl SavingsGoal {
    pub fn new(owner_id: UserId, name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: SavingsGoalId::new(),
            owner_id,
            name: name.into(),
            target_amount,
            target_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress from the savings contributions linked to this goal
    pub fn progress<'a>(&self, transactions: impl IntoIterator<Item = &'a Transaction>) -> GoalProgress {
        let saved: Money = transactions
            .into_iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Savings && t.savings_goal_id == Some(self.id)
            })
            .map(|t| t.amount)
            .sum();

        let remaining = if saved >= self.target_amount {
            Money::zero()
        } else {
            self.target_amount - saved
        };

        GoalProgress {
            saved,
            remaining,
            percentage: saved.percentage_of(self.target_amount).min(100.0),
            reached: saved >= self.target_amount,
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }
        Ok(())
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.target_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalValidationError {
    #[error("Goal name cannot be empty")]
    EmptyName,

    #[error("Target amount must be greater than zero")]
    NonPositiveTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountId;

    fn contribution(goal: &SavingsGoal, cents: i64) -> Transaction {
        let mut txn = Transaction::new(
            goal.owner_id,
            AccountId::new(),
            TransactionType::Savings,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        txn.savings_goal_id = Some(goal.id);
        txn
    }

    #[test]
    fn test_progress() {
        let goal = SavingsGoal::new(UserId::new(), "Laptop", Money::from_cents(100000));
        let txns = vec![contribution(&goal, 25000), contribution(&goal, 15000)];

        let progress = goal.progress(&txns);
        assert_eq!(progress.saved, Money::from_cents(40000));
        assert_eq!(progress.remaining, Money::from_cents(60000));
        assert_eq!(progress.percentage, 40.0);
        assert!(!progress.reached);
    }

    #[test]
    fn test_progress_caps_at_target() {
        let goal = SavingsGoal::new(UserId::new(), "Trip", Money::from_cents(1000));
        let txns = vec![contribution(&goal, 1500)];

        let progress = goal.progress(&txns);
        assert!(progress.reached);
        assert_eq!(progress.remaining, Money::zero());
        assert_eq!(progress.percentage, 100.0);
    }

    #[test]
    fn test_other_goals_ignored() {
        let goal = SavingsGoal::new(UserId::new(), "Trip", Money::from_cents(1000));
        let other = SavingsGoal::new(goal.owner_id, "Car", Money::from_cents(1000));
        let txns = vec![contribution(&other, 500)];

        assert_eq!(goal.progress(&txns).saved, Money::zero());
    }

    #[test]
    fn test_validation() {
        let mut goal = SavingsGoal::new(UserId::new(), "Trip", Money::zero());
        assert_eq!(goal.validate(), Err(GoalValidationError::NonPositiveTarget));

        goal.target_amount = Money::from_cents(100);
        goal.name = String::new();
        assert_eq!(goal.validate(), Err(GoalValidationError::EmptyName));
    }
}
