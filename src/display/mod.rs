//! Terminal formatting for ledger records
//!
//! Everything here returns a `String`; printing is left to the CLI.

pub mod account;
pub mod category;
pub mod planning;
pub mod transaction;

pub use account::format_account_list;
pub use category::format_category_list;
pub use planning::{format_budget_list, format_goal_list};
pub use transaction::{format_scan_result, format_transaction_details, format_transaction_register};

/// Shorten `s` to at most `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
