//! Expense and income breakdown by category
//!
//! Groups the transactions of one kind inside a date range by category and
//! works out each category's share of the total.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::PocketResult;
use crate::models::{Category, CategoryId, DateRange, Money, Transaction, TransactionType};

/// Which side of the ledger a category report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Expense,
    Income,
}

impl ReportKind {
    fn includes(&self, txn: &Transaction) -> bool {
        matches!(
            (self, txn.transaction_type),
            (Self::Expense, TransactionType::Expense) | (Self::Income, TransactionType::Income)
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// Totals for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// None groups uncategorized transactions
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of the report total, 0-100
    pub percentage: f64,
}

/// Category breakdown for one report kind and range
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub kind: ReportKind,
    pub range: DateRange,
    pub categories: Vec<CategorySummary>,
    pub total: Money,
    pub transaction_count: usize,
}

const UNCATEGORIZED: &str = "Uncategorized";
const UNKNOWN_CATEGORY: &str = "(deleted category)";

impl CategoryReport {
    /// Build the report from a snapshot of transactions
    ///
    /// Categories listed in `order` come first, in that order; the rest
    /// follow in the order they first appear in `transactions`. Entries are
    /// never re-sorted by amount.
    pub fn generate(
        transactions: &[Transaction],
        categories: &[Category],
        kind: ReportKind,
        range: DateRange,
        order: &[CategoryId],
    ) -> Self {
        let mut slots: HashMap<Option<CategoryId>, usize> = HashMap::new();
        let mut buckets: Vec<(Option<CategoryId>, Money, usize)> = Vec::new();

        for txn in transactions
            .iter()
            .filter(|t| range.contains(t.date()) && kind.includes(t))
        {
            let slot = *slots.entry(txn.category_id).or_insert_with(|| {
                buckets.push((txn.category_id, Money::zero(), 0));
                buckets.len() - 1
            });
            buckets[slot].1 += txn.amount;
            buckets[slot].2 += 1;
        }

        let total: Money = buckets.iter().map(|(_, amount, _)| *amount).sum();
        let transaction_count = buckets.iter().map(|(_, _, count)| count).sum();

        // Stable sort keeps insertion order among categories outside `order`
        let rank = |id: &Option<CategoryId>| {
            id.and_then(|id| order.iter().position(|o| *o == id))
                .unwrap_or(order.len())
        };
        buckets.sort_by_key(|(id, _, _)| rank(id));

        let names: HashMap<CategoryId, &str> =
            categories.iter().map(|c| (c.id, c.name.as_str())).collect();

        let categories = buckets
            .into_iter()
            .map(|(category_id, amount, count)| CategorySummary {
                category_id,
                category_name: match category_id {
                    None => UNCATEGORIZED.to_string(),
                    Some(id) => names.get(&id).copied().unwrap_or(UNKNOWN_CATEGORY).to_string(),
                },
                total: amount,
                transaction_count: count,
                percentage: amount.percentage_of(total),
            })
            .collect();

        Self {
            kind,
            range,
            categories,
            total,
            transaction_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The `limit` largest categories; equal totals keep report order
    pub fn top(&self, limit: usize) -> Vec<&CategorySummary> {
        let mut all: Vec<_> = self.categories.iter().collect();
        all.sort_by(|a, b| b.total.cmp(&a.total));
        all.truncate(limit);
        all
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} Report: {}\n", self.kind, self.range));
        output.push_str(&"=".repeat(64));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No transactions in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<30} {:>16} {:>7} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for summary in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>16} {:>7} {:>6.1}%\n",
                truncate(&summary.category_name, 30),
                summary.total.format_with_symbol(currency_symbol),
                summary.transaction_count,
                summary.percentage
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>16} {:>7}\n",
            "TOTAL",
            self.total.format_with_symbol(currency_symbol),
            self.transaction_count
        ));

        output
    }

    /// Export the report rows as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> PocketResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "start_date",
            "end_date",
            "kind",
            "category",
            "amount",
            "transactions",
            "percentage",
        ])?;

        let start = self.range.start.to_string();
        let end = self.range.end.to_string();
        let kind = self.kind.to_string().to_lowercase();

        for summary in &self.categories {
            csv.write_record([
                start.as_str(),
                end.as_str(),
                kind.as_str(),
                summary.category_name.as_str(),
                summary.total.to_decimal_string().as_str(),
                summary.transaction_count.to_string().as_str(),
                format!("{:.2}", summary.percentage).as_str(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
