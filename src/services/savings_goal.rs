//! Savings goal service

use chrono::NaiveDate;
use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{GoalProgress, Money, SavingsGoal, SavingsGoalId, UserId};
use crate::storage::Storage;
use crate::validation::{validate_name, FormValidation};

pub struct SavingsGoalService<'a> {
    storage: &'a Storage,
    user: UserId,
}

/// A goal with its progress
#[derive(Debug, Clone)]
pub struct GoalSummary {
    pub goal: SavingsGoal,
    pub progress: GoalProgress,
}

impl<'a> SavingsGoalService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    pub fn create(
        &self,
        name: &str,
        target_amount: Money,
        target_date: Option<NaiveDate>,
    ) -> PocketResult<SavingsGoal> {
        FormValidation::new()
            .check("name", validate_name(name))
            .ensure_valid()?;

        let mut goal = SavingsGoal::new(self.user, name.trim(), target_amount);
        goal.target_date = target_date;
        goal.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.goals.insert(goal.clone())?;
        self.storage.goals.save()?;

        info!(goal = %goal.id, name = %goal.name, target = %goal.target_amount, "savings goal created");
        Ok(goal)
    }

    pub fn get(&self, id: SavingsGoalId) -> PocketResult<Option<SavingsGoal>> {
        Ok(self.storage.goals.get(id)?.filter(|g| g.owner_id == self.user))
    }

    pub fn require(&self, id: SavingsGoalId) -> PocketResult<SavingsGoal> {
        self.get(id)?
            .ok_or_else(|| PocketError::goal_not_found(id.to_string()))
    }

    /// Find a goal by short id or name
    pub fn find(&self, identifier: &str) -> PocketResult<Option<SavingsGoal>> {
        let identifier = identifier.trim();
        self.storage.goals.find(|g| {
            g.owner_id == self.user
                && (g.id.matches(identifier) || g.name.eq_ignore_ascii_case(identifier))
        })
    }

    pub fn list(&self) -> PocketResult<Vec<SavingsGoal>> {
        self.storage.goals.get_by_owner(self.user)
    }

    pub fn progress(&self, goal: &SavingsGoal) -> PocketResult<GoalProgress> {
        let contributions = self
            .storage
            .transactions
            .filter(|t| t.savings_goal_id == Some(goal.id))?;
        Ok(goal.progress(&contributions))
    }

    pub fn list_with_progress(&self) -> PocketResult<Vec<GoalSummary>> {
        self.list()?
            .into_iter()
            .map(|goal| {
                let progress = self.progress(&goal)?;
                Ok(GoalSummary { goal, progress })
            })
            .collect()
    }
}
