//! Account CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_account_list;
use crate::error::{PocketError, PocketResult};
use crate::models::{AccountType, Money};
use crate::services::AccountService;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create a new account
    Add {
        /// Account name
        name: String,
        /// cash, bank, ewallet, credit, other
        #[arg(short = 't', long = "type", default_value = "cash")]
        account_type: String,
        /// Opening balance (e.g. "1000.00"); may be negative
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List accounts with balances
    List {
        /// Include archived accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Archive an account so it takes no new transactions
    Archive {
        /// Account name or ID
        account: String,
    },
    /// Delete an account without transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> PocketResult<()> {
    let service = AccountService::new(storage, settings.user_id);

    match cmd {
        AccountCommands::Add {
            name,
            account_type,
            balance,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                PocketError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: cash, bank, ewallet, credit, other",
                    account_type
                ))
            })?;
            let balance = Money::parse(&balance).map_err(|e| {
                PocketError::Validation(format!("Invalid balance '{}': {}", balance, e))
            })?;

            let account = service.create(&name, account_type, balance)?;
            println!("Created account: {}", account.name);
            println!("  Type:    {}", account.account_type);
            println!(
                "  Balance: {}",
                account.initial_balance.format_with_symbol(&settings.currency_symbol)
            );
            println!("  ID:      {}", account.id);
        }

        AccountCommands::List { all } => {
            let summaries = service.list_with_balances(all)?;
            print!("{}", format_account_list(&summaries, &settings.currency_symbol));
        }

        AccountCommands::Archive { account } => {
            let found = service
                .find(&account)?
                .ok_or_else(|| PocketError::account_not_found(&account))?;
            let archived = service.archive(found.id)?;
            println!("Archived account: {}", archived.name);
        }

        AccountCommands::Delete { account } => {
            let found = service
                .find(&account)?
                .ok_or_else(|| PocketError::account_not_found(&account))?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
