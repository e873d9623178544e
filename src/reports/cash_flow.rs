//! Monthly cash flow
//!
//! Income against expenses per calendar month. Savings contributions and
//! transfers between accounts are movements of the user's own money and
//! are left out.

use std::io::Write;

use serde::Serialize;

use crate::error::PocketResult;
use crate::models::{DateRange, Money, Month, Transaction, TransactionType};

/// Income and expense totals for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: Month,
    pub income: Money,
    pub expense: Money,
    /// income - expense
    pub net: Money,
}

/// Cash flow per month for a date range
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowReport {
    pub range: DateRange,
    /// Months in the order they first appear in the input
    pub months: Vec<MonthlyFlow>,
    pub total_income: Money,
    pub total_expense: Money,
}

impl CashFlowReport {
    pub fn generate(transactions: &[Transaction], range: DateRange) -> Self {
        let mut months: Vec<MonthlyFlow> = Vec::new();

        for txn in transactions.iter().filter(|t| range.contains(t.date())) {
            if !matches!(
                txn.transaction_type,
                TransactionType::Income | TransactionType::Expense
            ) {
                continue;
            }

            let month = Month::of(txn.date());
            let idx = match months.iter().position(|m| m.month == month) {
                Some(idx) => idx,
                None => {
                    months.push(MonthlyFlow {
                        month,
                        income: Money::zero(),
                        expense: Money::zero(),
                        net: Money::zero(),
                    });
                    months.len() - 1
                }
            };

            match txn.transaction_type {
                TransactionType::Income => months[idx].income += txn.amount,
                _ => months[idx].expense += txn.amount,
            }
        }

        for flow in &mut months {
            flow.net = flow.income - flow.expense;
        }

        let total_income = months.iter().map(|m| m.income).sum();
        let total_expense = months.iter().map(|m| m.expense).sum();

        Self {
            range,
            months,
            total_income,
            total_expense,
        }
    }

    pub fn net(&self) -> Money {
        self.total_income - self.total_expense
    }

    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Cash Flow: {}\n", self.range));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.months.is_empty() {
            output.push_str("No income or expenses in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<9} {:>16} {:>16} {:>16}\n",
            "Month", "Income", "Expense", "Net"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for flow in &self.months {
            output.push_str(&format!(
                "{:<9} {:>16} {:>16} {:>16}\n",
                flow.month.to_string(),
                flow.income.format_with_symbol(currency_symbol),
                flow.expense.format_with_symbol(currency_symbol),
                flow.net.format_with_symbol(currency_symbol)
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<9} {:>16} {:>16} {:>16}\n",
            "TOTAL",
            self.total_income.format_with_symbol(currency_symbol),
            self.total_expense.format_with_symbol(currency_symbol),
            self.net().format_with_symbol(currency_symbol)
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> PocketResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["month", "income", "expense", "net"])?;

        for flow in &self.months {
            csv.write_record([
                flow.month.to_string(),
                flow.income.to_decimal_string(),
                flow.expense.to_decimal_string(),
                flow.net.to_decimal_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, SavingsGoalId, UserId};
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, cents: i64, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            UserId::new(),
            AccountId::new(),
            kind,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn year_2025() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_two_months_net() {
        let txns = vec![
            txn(TransactionType::Income, 1000, 2025, 1, 5),
            txn(TransactionType::Expense, 400, 2025, 1, 6),
            txn(TransactionType::Income, 2000, 2025, 2, 5),
            txn(TransactionType::Expense, 500, 2025, 2, 20),
        ];

        let report = CashFlowReport::generate(&txns, year_2025());
        let nets: Vec<_> = report.months.iter().map(|m| m.net).collect();
        assert_eq!(nets, vec![Money::from_cents(600), Money::from_cents(1500)]);
        assert_eq!(report.months[0].month, Month::new(2025, 1).unwrap());
        assert_eq!(report.net(), Money::from_cents(2100));
    }

    #[test]
    fn test_months_keep_input_order() {
        let txns = vec![
            txn(TransactionType::Expense, 100, 2025, 3, 1),
            txn(TransactionType::Income, 100, 2025, 1, 1),
            txn(TransactionType::Expense, 50, 2025, 3, 2),
        ];

        let report = CashFlowReport::generate(&txns, year_2025());
        let months: Vec<_> = report.months.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(months, vec!["2025-03", "2025-01"]);
        assert_eq!(report.months[0].expense, Money::from_cents(150));
    }

    #[test]
    fn test_savings_and_transfers_excluded() {
        let mut saving = txn(TransactionType::Savings, 700, 2025, 4, 1);
        saving.savings_goal_id = Some(SavingsGoalId::new());
        let txns = vec![
            saving,
            txn(TransactionType::Transfer, 300, 2025, 4, 2),
            txn(TransactionType::Expense, 100, 2025, 4, 3),
        ];

        let report = CashFlowReport::generate(&txns, year_2025());
        assert_eq!(report.months.len(), 1);
        assert_eq!(report.total_expense, Money::from_cents(100));
        assert_eq!(report.total_income, Money::zero());
        assert_eq!(report.months[0].net, Money::from_cents(-100));
    }

    #[test]
    fn test_empty() {
        let report = CashFlowReport::generate(&[], year_2025());
        assert!(report.months.is_empty());
        assert_eq!(report.net(), Money::zero());
        assert!(report.format_terminal("$").contains("No income or expenses"));
    }

    #[test]
    fn test_export_csv() {
        let txns = vec![
            txn(TransactionType::Income, 150000, 2025, 5, 1),
            txn(TransactionType::Expense, 2550, 2025, 5, 9),
        ];
        let report = CashFlowReport::generate(&txns, year_2025());

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("month,income,expense,net\n"));
        assert!(csv.contains("2025-05,1500.00,25.50,1474.50"));
    }
}
