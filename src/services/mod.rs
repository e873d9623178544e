//! Service layer
//!
//! Business rules on top of storage: input validation, per-user ownership,
//! built-in category protection and cross-entity operations such as
//! transfers. Every service is bound to one user.

pub mod account;
pub mod budget;
pub mod category;
pub mod savings_goal;
pub mod transaction;
pub mod transfer;

pub use account::{AccountService, AccountSummary};
pub use budget::{BudgetService, BudgetSummary};
pub use category::CategoryService;
pub use savings_goal::{GoalSummary, SavingsGoalService};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
pub use transfer::{TransferResult, TransferService};
