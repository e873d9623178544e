//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_list;
use crate::error::{PocketError, PocketResult};
use crate::models::CategoryType;
use crate::services::CategoryService;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List built-in and custom categories
    List {
        /// Only "expense" or "income"
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },
    /// Create a custom category
    Add {
        name: String,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", default_value = "expense")]
        category_type: String,
        /// Icon reference
        #[arg(short, long, default_value = "")]
        icon: String,
    },
    /// Rename a custom category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },
    /// Delete a custom category; its transactions become uncategorized
    Delete {
        /// Category name or ID
        category: String,
    },
}

fn parse_type(raw: &str) -> PocketResult<CategoryType> {
    CategoryType::parse(raw).ok_or_else(|| {
        PocketError::Validation(format!(
            "Invalid category type: '{}'. Use expense or income",
            raw
        ))
    })
}

pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> PocketResult<()> {
    let service = CategoryService::new(storage, settings.user_id);

    match cmd {
        CategoryCommands::List { category_type } => {
            let categories = match category_type {
                Some(raw) => service.list_by_type(parse_type(&raw)?)?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add {
            name,
            category_type,
            icon,
        } => {
            let category = service.create(&name, &icon, parse_type(&category_type)?)?;
            println!("Created {} category: {}", category.category_type, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Rename { category, name } => {
            let found = service
                .find(&category)?
                .ok_or_else(|| PocketError::category_not_found(&category))?;
            let old_name = found.name.clone();
            let renamed = service.rename(found.id, &name)?;
            println!("Renamed category '{}' to '{}'", old_name, renamed.name);
        }

        CategoryCommands::Delete { category } => {
            let found = service
                .find(&category)?
                .ok_or_else(|| PocketError::category_not_found(&category))?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
