//! Transaction CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{PocketError, PocketResult};
use crate::models::TransactionType;
use crate::services::{
    AccountService, CategoryService, CreateTransactionInput, SavingsGoalService,
    TransactionFilter, TransactionService, TransferService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date_time, parse_line_item, parse_range};

#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record an expense, income or savings contribution
    Add {
        /// Account name or ID
        account: String,
        /// Amount, e.g. "12.50"
        amount: String,
        /// expense, income or savings
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
        /// Category name, key or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Savings goal name or ID (savings only)
        #[arg(short, long)]
        goal: Option<String>,
        /// "YYYY-MM-DD" or "YYYY-MM-DD HH:MM" (default: now)
        #[arg(short, long)]
        date: Option<String>,
        /// Free text description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Line item as NAME:QTY:PRICE; repeat for more items
        #[arg(short, long = "item")]
        items: Vec<String>,
    },
    /// List transactions, newest first
    List {
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// YYYY-MM or YYYY-MM-DD..YYYY-MM-DD
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction with its line items
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction (both legs for a transfer)
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Move money between two accounts
    Transfer {
        /// Source account name or ID
        from: String,
        /// Destination account name or ID
        to: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
}

fn parse_type(raw: &str) -> PocketResult<TransactionType> {
    TransactionType::parse(raw).ok_or_else(|| {
        PocketError::Validation(format!(
            "Invalid transaction type: '{}'. Use expense, income, savings or transfer",
            raw
        ))
    })
}

pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> PocketResult<()> {
    let user = settings.user_id;
    let service = TransactionService::new(storage, user);
    let accounts = AccountService::new(storage, user);
    let categories = CategoryService::new(storage, user);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            transaction_type,
            category,
            goal,
            date,
            description,
            items,
        } => {
            let account = accounts
                .find(&account)?
                .ok_or_else(|| PocketError::account_not_found(&account))?;
            let amount = parse_amount("amount", &amount)?;
            let transaction_type = parse_type(&transaction_type)?;

            let mut input = CreateTransactionInput::new(
                account.id,
                transaction_type,
                amount,
                parse_date_time(date.as_deref())?,
            );
            input.description = description.unwrap_or_default();
            input.line_items = items
                .iter()
                .map(|raw| parse_line_item(raw))
                .collect::<PocketResult<_>>()?;

            if let Some(category) = category {
                let found = categories
                    .find(&category)?
                    .ok_or_else(|| PocketError::category_not_found(&category))?;
                input.category_id = Some(found.id);
            }
            if let Some(goal) = goal {
                let found = SavingsGoalService::new(storage, user)
                    .find(&goal)?
                    .ok_or_else(|| PocketError::goal_not_found(&goal))?;
                input.savings_goal_id = Some(found.id);
            }

            let txn = service.create(input)?;
            println!(
                "Recorded {} of {} in {}",
                txn.transaction_type.to_string().to_lowercase(),
                txn.amount.format_with_symbol(symbol),
                account.name
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            category,
            transaction_type,
            period,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                let found = accounts
                    .find(&account)?
                    .ok_or_else(|| PocketError::account_not_found(&account))?;
                filter = filter.account(found.id);
            }
            if let Some(category) = category {
                let found = categories
                    .find(&category)?
                    .ok_or_else(|| PocketError::category_not_found(&category))?;
                filter = filter.category(found.id);
            }
            if let Some(raw) = transaction_type {
                filter = filter.transaction_type(parse_type(&raw)?);
            }
            if let Some(raw) = period {
                filter = filter.range(parse_range(Some(&raw))?);
            }

            let transactions = service.list(&filter)?;
            let names: HashMap<_, _> = categories
                .list()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!("{}", format_transaction_register(&transactions, &names, symbol));
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| PocketError::transaction_not_found(&id))?;
            let account_name = accounts
                .get(txn.account_id)?
                .map(|a| a.name)
                .unwrap_or_else(|| txn.account_id.to_string());
            let category_name = match txn.category_id {
                Some(id) => categories.get(id)?.map(|c| c.name),
                None => None,
            };
            print!(
                "{}",
                format_transaction_details(&txn, &account_name, category_name.as_deref(), symbol)
            );
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| PocketError::transaction_not_found(&id))?;
            let removed = service.delete(txn.id)?;
            if removed.len() > 1 {
                println!("Deleted transfer {} and its linked leg", txn.id);
            } else {
                println!("Deleted transaction {}", txn.id);
            }
        }

        TransactionCommands::Transfer {
            from,
            to,
            amount,
            date,
            description,
        } => {
            let from = accounts
                .find(&from)?
                .ok_or_else(|| PocketError::account_not_found(&from))?;
            let to = accounts
                .find(&to)?
                .ok_or_else(|| PocketError::account_not_found(&to))?;
            let amount = parse_amount("amount", &amount)?;

            let result = TransferService::new(storage, user).create_transfer(
                from.id,
                to.id,
                amount,
                parse_date_time(date.as_deref())?,
                description,
            )?;
            println!(
                "Transferred {} from {} to {}",
                amount.format_with_symbol(symbol),
                from.name,
                to.name
            );
            println!("  Out: {}", result.from_transaction.id);
            println!("  In:  {}", result.to_transaction.id);
        }
    }

    Ok(())
}
