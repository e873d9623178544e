//! Result of scanning a receipt
//!
//! A `ScanResult` is a transient value used to pre-fill a new transaction.
//! It is never stored on its own.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::LineItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Merchant as printed on the receipt, if recognised
    pub merchant_name: Option<String>,

    pub date_time: NaiveDateTime,

    pub total_amount: Money,

    /// Standard key of the guessed built-in category
    pub category_key: Option<String>,

    pub line_items: Vec<LineItem>,

    /// Reference to the scanned image
    pub receipt_image: Option<String>,
}

impl ScanResult {
    /// Sum of the recognised line items
    pub fn line_items_total(&self) -> Money {
        self.line_items.iter().map(LineItem::total).sum()
    }

    /// Whether the itemised lines add up to the printed total
    ///
    /// Receipts often list tax or service charges outside the item lines,
    /// so a mismatch is informational only.
    pub fn items_match_total(&self) -> bool {
        !self.line_items.is_empty() && self.line_items_total() == self.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_items_match_total() {
        let mut result = ScanResult {
            merchant_name: Some("Corner Cafe".into()),
            date_time: NaiveDate::from_ymd_opt(2025, 2, 3)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
            total_amount: Money::from_cents(2500),
            category_key: Some("food_drink".into()),
            line_items: vec![
                LineItem::new("Latte", 2, Money::from_cents(1000)),
                LineItem::new("Croissant", 1, Money::from_cents(500)),
            ],
            receipt_image: None,
        };
        assert!(result.items_match_total());

        result.line_items.pop();
        assert_eq!(result.line_items_total(), Money::from_cents(2000));
        assert!(!result.items_match_total());
    }

    #[test]
    fn test_huge_line_items_do_not_overflow() {
        let result = ScanResult {
            merchant_name: None,
            date_time: NaiveDate::from_ymd_opt(2025, 2, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            total_amount: Money::from_cents(100),
            category_key: None,
            line_items: vec![
                LineItem::new("x", 2, Money::from_cents(i64::MAX / 2 + 1)),
                LineItem::new("y", 1, Money::from_cents(i64::MAX)),
            ],
            receipt_image: None,
        };

        assert_eq!(result.line_items_total(), Money::from_cents(i64::MAX));
        assert!(!result.items_match_total());
    }
}
