//! Savings goal and budget formatting

use crate::services::{BudgetSummary, GoalSummary};

use super::truncate;

fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn format_goal_list(goals: &[GoalSummary], currency_symbol: &str) -> String {
    if goals.is_empty() {
        return "No savings goals found.\n".to_string();
    }

    let mut output = String::new();
    for summary in goals {
        let goal = &summary.goal;
        let progress = &summary.progress;
        let deadline = goal
            .target_date
            .map(|d| format!(" by {}", d))
            .unwrap_or_default();

        output.push_str(&format!(
            "{:13} {}{}\n",
            goal.id.to_string(),
            truncate(&goal.name, 40),
            deadline
        ));
        output.push_str(&format!(
            "              {} {:>5.1}%  {} of {}{}\n",
            progress_bar(progress.percentage, 20),
            progress.percentage,
            progress.saved.format_with_symbol(currency_symbol),
            goal.target_amount.format_with_symbol(currency_symbol),
            if progress.reached { "  reached" } else { "" }
        ));
    }
    output
}

pub fn format_budget_list(budgets: &[BudgetSummary], currency_symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = format!(
        "{:22} {:25} {:>14} {:>14} {:>14}\n",
        "Category", "Period", "Limit", "Spent", "Remaining"
    );
    output.push_str(&"-".repeat(93));
    output.push('\n');

    for summary in budgets {
        let status = &summary.status;
        output.push_str(&format!(
            "{:22} {:25} {:>14} {:>14} {:>14}{}\n",
            truncate(&summary.category_name, 22),
            summary.budget.period.to_string(),
            status.limit.format_with_symbol(currency_symbol),
            status.spent.format_with_symbol(currency_symbol),
            status.remaining.format_with_symbol(currency_symbol),
            if status.is_over_budget() { "  OVER" } else { "" }
        ));
    }
    output
}
