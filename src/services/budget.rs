//! Budget service
//!
//! Spending limits per expense category over a date range.

use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{Budget, BudgetId, BudgetStatus, CategoryId, CategoryType, DateRange, Money, UserId};
use crate::services::CategoryService;
use crate::storage::Storage;

pub struct BudgetService<'a> {
    storage: &'a Storage,
    user: UserId,
}

/// A budget with its category name and current status
#[derive(Debug, Clone)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub category_name: String,
    pub status: BudgetStatus,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    pub fn create(
        &self,
        category_id: CategoryId,
        limit: Money,
        period: DateRange,
    ) -> PocketResult<Budget> {
        let category = CategoryService::new(self.storage, self.user).require(category_id)?;
        if category.category_type != CategoryType::Expense {
            return Err(PocketError::Validation(format!(
                "Budgets apply to expense categories; '{}' is an income category",
                category.name
            )));
        }

        let overlapping = self.storage.budgets.find(|b| {
            b.owner_id == self.user
                && b.category_id == category_id
                && b.period.start <= period.end
                && period.start <= b.period.end
        })?;
        if let Some(existing) = overlapping {
            return Err(PocketError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} {}", category.name, existing.period),
            });
        }

        let budget = Budget::new(self.user, category_id, limit, period);
        budget
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.budgets.insert(budget.clone())?;
        self.storage.budgets.save()?;

        info!(budget = %budget.id, category = %category.name, limit = %budget.limit, "budget created");
        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> PocketResult<Option<Budget>> {
        Ok(self.storage.budgets.get(id)?.filter(|b| b.owner_id == self.user))
    }

    pub fn list(&self) -> PocketResult<Vec<Budget>> {
        self.storage.budgets.get_by_owner(self.user)
    }

    pub fn status(&self, budget: &Budget) -> PocketResult<BudgetStatus> {
        let spending = self.storage.transactions.filter(|t| {
            t.owner_id == self.user && t.category_id == Some(budget.category_id)
        })?;
        Ok(budget.status(&spending))
    }

    pub fn list_with_status(&self) -> PocketResult<Vec<BudgetSummary>> {
        let categories = CategoryService::new(self.storage, self.user);
        self.list()?
            .into_iter()
            .map(|budget| {
                let category_name = categories
                    .get(budget.category_id)?
                    .map(|c| c.name)
                    .unwrap_or_else(|| "(deleted category)".to_string());
                let status = self.status(&budget)?;
                Ok(BudgetSummary {
                    budget,
                    category_name,
                    status,
                })
            })
            .collect()
    }
}
