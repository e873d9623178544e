//! Category display formatting

use crate::models::{Category, CategoryType};

use super::truncate;

/// Categories grouped by type, built-ins marked
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut output = String::new();

    for (heading, kind) in [("Expense", CategoryType::Expense), ("Income", CategoryType::Income)] {
        let group: Vec<_> = categories
            .iter()
            .filter(|c| c.category_type == kind)
            .collect();
        if group.is_empty() {
            continue;
        }

        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(heading);
        output.push('\n');
        output.push_str(&"-".repeat(heading.len()));
        output.push('\n');

        for category in group {
            let origin = match &category.standard_key {
                Some(key) if category.is_built_in() => format!("built-in: {}", key),
                _ => "custom".to_string(),
            };
            output.push_str(&format!(
                "  {:13} {:26} {}\n",
                category.id.to_string(),
                truncate(&category.name, 26),
                origin
            ));
        }
    }

    output
}
