//! Budget CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_budget_list;
use crate::error::{PocketError, PocketResult};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

use super::{parse_amount, parse_range};

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set a spending limit for an expense category
    Add {
        /// Category name, key or ID
        category: String,
        /// Spending limit
        limit: String,
        /// YYYY-MM or YYYY-MM-DD..YYYY-MM-DD (default: this month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// List budgets with spending so far
    List,
}

pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> PocketResult<()> {
    let service = BudgetService::new(storage, settings.user_id);

    match cmd {
        BudgetCommands::Add {
            category,
            limit,
            period,
        } => {
            let found = CategoryService::new(storage, settings.user_id)
                .find(&category)?
                .ok_or_else(|| PocketError::category_not_found(&category))?;
            let limit = parse_amount("limit", &limit)?;
            let period = parse_range(period.as_deref())?;

            let budget = service.create(found.id, limit, period)?;
            println!(
                "Budget for {}: {} ({})",
                found.name,
                budget.limit.format_with_symbol(&settings.currency_symbol),
                budget.period
            );
        }

        BudgetCommands::List => {
            let budgets = service.list_with_status()?;
            print!("{}", format_budget_list(&budgets, &settings.currency_symbol));
        }
    }

    Ok(())
}
