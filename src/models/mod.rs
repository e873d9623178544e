//! Core data models for pocket-ledger
//!
//! This module contains the data structures of the personal finance domain:
//! accounts, transactions, categories, savings goals, budgets and the
//! transient result of a receipt scan.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod savings_goal;
pub mod scan;
pub mod transaction;

pub use account::{Account, AccountType};
pub use budget::{Budget, BudgetStatus};
pub use category::{standard_category, Category, CategoryType, StandardCategory, STANDARD_CATEGORIES};
pub use ids::{AccountId, BudgetId, CategoryId, SavingsGoalId, TransactionId, UserId};
pub use money::Money;
pub use period::{DateRange, Month};
pub use savings_goal::{GoalProgress, SavingsGoal};
pub use scan::ScanResult;
pub use transaction::{LineItem, Transaction, TransactionType, TransferDirection};
