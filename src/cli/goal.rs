//! Savings goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_goal_list;
use crate::error::PocketResult;
use crate::services::SavingsGoalService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        name: String,
        /// Target amount
        target: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,
    },
    /// List goals with progress
    List,
}

pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> PocketResult<()> {
    let service = SavingsGoalService::new(storage, settings.user_id);

    match cmd {
        GoalCommands::Add { name, target, by } => {
            let target = parse_amount("target", &target)?;
            let by = by.as_deref().map(parse_date).transpose()?;

            let goal = service.create(&name, target, by)?;
            println!(
                "Created savings goal: {} ({})",
                goal.name,
                goal.target_amount.format_with_symbol(&settings.currency_symbol)
            );
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            let goals = service.list_with_progress()?;
            print!("{}", format_goal_list(&goals, &settings.currency_symbol));
        }
    }

    Ok(())
}
