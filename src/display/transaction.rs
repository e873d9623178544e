//! Transaction display formatting

use std::collections::HashMap;

use crate::models::{CategoryId, ScanResult, Transaction, TransactionType, TransferDirection};

use super::truncate;

fn type_marker(txn: &Transaction) -> &'static str {
    match (txn.transaction_type, txn.transfer_direction) {
        (TransactionType::Expense, _) => "-",
        (TransactionType::Income, _) => "+",
        (TransactionType::Savings, _) => "S",
        (TransactionType::Transfer, Some(TransferDirection::Incoming)) => "⇠",
        (TransactionType::Transfer, _) => "⇢",
    }
}

/// One register row
pub fn format_transaction_row(
    txn: &Transaction,
    category_name: Option<&str>,
    currency_symbol: &str,
) -> String {
    let description = if txn.description.is_empty() {
        "(no description)"
    } else {
        txn.description.as_str()
    };
    let items = if txn.is_itemised() {
        format!(" [{}]", txn.line_items.len())
    } else {
        String::new()
    };

    format!(
        "{:13} {} {:16} {:22} {:18} {:>14}{}",
        txn.id.to_string(),
        type_marker(txn),
        txn.date_time.format("%Y-%m-%d %H:%M"),
        truncate(description, 22),
        truncate(category_name.unwrap_or(""), 18),
        txn.amount.format_with_symbol(currency_symbol),
        items
    )
}

/// Transactions as a register, with category names resolved from `categories`
pub fn format_transaction_register(
    transactions: &[Transaction],
    categories: &HashMap<CategoryId, String>,
    currency_symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = format!(
        "{:13} {} {:16} {:22} {:18} {:>14}\n",
        "ID", " ", "Date", "Description", "Category", "Amount"
    );
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for txn in transactions {
        let category = txn
            .category_id
            .and_then(|id| categories.get(&id))
            .map(String::as_str);
        output.push_str(&format_transaction_row(txn, category, currency_symbol));
        output.push('\n');
    }

    output
}

pub fn format_transaction_details(
    txn: &Transaction,
    account_name: &str,
    category_name: Option<&str>,
    currency_symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Date:        {}\n", txn.date_time.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Account:     {}\n", account_name));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    match (txn.transaction_type, category_name) {
        (TransactionType::Transfer, _) => {}
        (_, Some(name)) => output.push_str(&format!("Category:    {}\n", name)),
        (_, None) => output.push_str("Category:    (uncategorized)\n"),
    }

    if let Some(pair) = txn.transfer_pair_id {
        output.push_str(&format!("Linked leg:  {}\n", pair));
    }
    if let Some(goal) = txn.savings_goal_id {
        output.push_str(&format!("Goal:        {}\n", goal));
    }
    if let Some(image) = &txn.receipt_image {
        output.push_str(&format!("Receipt:     {}\n", image));
    }

    if txn.is_itemised() {
        output.push_str("\nItems:\n");
        for item in &txn.line_items {
            output.push_str(&format!(
                "  {:28} {:>4} x {:>12} = {:>12}\n",
                truncate(&item.name, 28),
                item.quantity,
                item.price.format_with_symbol(currency_symbol),
                item.total().format_with_symbol(currency_symbol)
            ));
        }
    }

    output
}

/// Preview of a scanned receipt before it is saved
pub fn format_scan_result(
    scan: &ScanResult,
    category_name: Option<&str>,
    currency_symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Merchant:    {}\n",
        scan.merchant_name.as_deref().unwrap_or("(unknown)")
    ));
    output.push_str(&format!("Date:        {}\n", scan.date_time.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!(
        "Total:       {}\n",
        scan.total_amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "Category:    {}\n",
        category_name.unwrap_or("(none)")
    ));

    if !scan.line_items.is_empty() {
        output.push_str("Items:\n");
        for item in &scan.line_items {
            output.push_str(&format!(
                "  {:28} {:>4} x {:>12}\n",
                truncate(&item.name, 28),
                item.quantity,
                item.price.format_with_symbol(currency_symbol)
            ));
        }
        if !scan.items_match_total() {
            output.push_str(&format!(
                "  (items add up to {})\n",
                scan.line_items_total().format_with_symbol(currency_symbol)
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, LineItem, Money, UserId};
    use chrono::NaiveDate;

    fn txn() -> Transaction {
        let mut txn = Transaction::new(
            UserId::new(),
            AccountId::new(),
            TransactionType::Expense,
            Money::from_cents(50000),
            NaiveDate::from_ymd_opt(2025, 1, 5)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
        );
        txn.description = "Toko Makmur".into();
        txn.line_items = vec![LineItem::new("Soap", 2, Money::from_cents(1000))];
        txn
    }

    #[test]
    fn test_register() {
        let txn = txn();
        let output = format_transaction_register(&[txn], &HashMap::new(), "$");
        assert!(output.contains("2025-01-05 19:30"));
        assert!(output.contains("Toko Makmur"));
        assert!(output.contains("$500.00"));
        assert!(output.contains("[1]"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(
            format_transaction_register(&[], &HashMap::new(), "$"),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_details_list_items() {
        let output = format_transaction_details(&txn(), "Wallet", Some("Shopping"), "$");
        assert!(output.contains("Account:     Wallet"));
        assert!(output.contains("Category:    Shopping"));
        assert!(output.contains("Soap"));
        assert!(output.contains("$20.00"));
    }
}
