//! Report entry point over one transaction snapshot

use crate::models::{Category, CategoryId, DateRange, Transaction};

use super::cash_flow::CashFlowReport;
use super::category_summary::{CategoryReport, ReportKind};

/// Builds reports from transactions already loaded by the caller
///
/// Pure: nothing is read from or written to storage.
#[derive(Debug, Clone)]
pub struct ReportAggregator<'a> {
    transactions: &'a [Transaction],
    categories: &'a [Category],
    order: Vec<CategoryId>,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(transactions: &'a [Transaction], categories: &'a [Category]) -> Self {
        Self {
            transactions,
            categories,
            order: Vec::new(),
        }
    }

    /// Categories to list first, in this order
    pub fn with_order(mut self, order: Vec<CategoryId>) -> Self {
        self.order = order;
        self
    }

    pub fn expense_by_category(&self, range: DateRange) -> CategoryReport {
        self.by_category(ReportKind::Expense, range)
    }

    pub fn income_by_category(&self, range: DateRange) -> CategoryReport {
        self.by_category(ReportKind::Income, range)
    }

    pub fn by_category(&self, kind: ReportKind, range: DateRange) -> CategoryReport {
        CategoryReport::generate(self.transactions, self.categories, kind, range, &self.order)
    }

    pub fn cash_flow(&self, range: DateRange) -> CashFlowReport {
        CashFlowReport::generate(self.transactions, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, CategoryType, Money, Month, TransactionType, UserId};
    use chrono::NaiveDate;

    #[test]
    fn test_reports_share_snapshot() {
        let user = UserId::new();
        let account = AccountId::new();
        let food = Category::new("Food", "ic_food", CategoryType::Expense, user);
        let bills = Category::new("Bills", "ic_bill", CategoryType::Expense, user);
        let at = |d| {
            NaiveDate::from_ymd_opt(2025, 6, d)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        };

        let mut lunch = Transaction::new(user, account, TransactionType::Expense, Money::from_cents(300), at(1));
        lunch.category_id = Some(food.id);
        let mut power = Transaction::new(user, account, TransactionType::Expense, Money::from_cents(100), at(2));
        power.category_id = Some(bills.id);
        let pay = Transaction::new(user, account, TransactionType::Income, Money::from_cents(1000), at(3));

        let txns = vec![lunch, power, pay];
        let categories = vec![food.clone(), bills.clone()];
        let june = Month::new(2025, 6).unwrap().range();

        let aggregator = ReportAggregator::new(&txns, &categories).with_order(vec![bills.id]);

        let expense = aggregator.expense_by_category(june);
        assert_eq!(expense.categories[0].category_name, "Bills");
        assert_eq!(expense.total, Money::from_cents(400));

        let income = aggregator.income_by_category(june);
        assert_eq!(income.categories[0].category_name, "Uncategorized");
        assert_eq!(income.categories[0].percentage, 100.0);

        let flow = aggregator.cash_flow(june);
        assert_eq!(flow.months[0].net, Money::from_cents(600));
    }
}
