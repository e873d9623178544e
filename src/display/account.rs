//! Account display formatting

use crate::services::AccountSummary;

use super::truncate;

pub fn format_account_list(accounts: &[AccountSummary], currency_symbol: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let mut output = format!(
        "{:13} {:24} {:12} {:>16} {:>6}\n",
        "ID", "Name", "Type", "Balance", "Txns"
    );
    output.push_str(&"-".repeat(75));
    output.push('\n');

    for summary in accounts {
        let account = &summary.account;
        let name = if account.archived {
            format!("{} (archived)", account.name)
        } else {
            account.name.clone()
        };
        output.push_str(&format!(
            "{:13} {:24} {:12} {:>16} {:>6}\n",
            account.id.to_string(),
            truncate(&name, 24),
            account.account_type.to_string(),
            summary.balance.format_with_symbol(currency_symbol),
            summary.transaction_count
        ));
    }

    let total: crate::models::Money = accounts
        .iter()
        .filter(|s| !s.account.archived)
        .map(|s| s.balance)
        .sum();
    output.push_str(&"-".repeat(75));
    output.push('\n');
    output.push_str(&format!(
        "{:13} {:24} {:12} {:>16}\n",
        "",
        "TOTAL",
        "",
        total.format_with_symbol(currency_symbol)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, Money, UserId};

    #[test]
    fn test_account_list() {
        let user = UserId::new();
        let summaries = vec![
            AccountSummary {
                account: Account::new(user, "Wallet", AccountType::Cash, Money::zero()),
                balance: Money::from_cents(1250),
                transaction_count: 3,
            },
            AccountSummary {
                account: Account::new(user, "Bank", AccountType::Bank, Money::zero()),
                balance: Money::from_cents(100000),
                transaction_count: 0,
            },
        ];

        let output = format_account_list(&summaries, "$");
        assert!(output.contains("Wallet"));
        assert!(output.contains("$12.50"));
        assert!(output.contains("$1,012.50"));
    }
}
