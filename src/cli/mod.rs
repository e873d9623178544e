//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Raw user input is
//! checked with the field rules in [`crate::validation`] before it reaches
//! a service.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod report;
pub mod scan;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_report_command, ReportCommands};
pub use scan::{handle_scan_command, ScanArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{PocketError, PocketResult};
use crate::models::{DateRange, LineItem, Money, Month};
use crate::validation::{validate_amount, validate_name, FormValidation};

/// Parse a user-entered amount, applying the amount rule first
pub(crate) fn parse_amount(field: &'static str, raw: &str) -> PocketResult<Money> {
    FormValidation::new()
        .check(field, validate_amount(raw))
        .ensure_valid()?;
    Money::parse(raw).map_err(|e| PocketError::Validation(format!("{}: {}", field, e)))
}

/// `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`; defaults to now
pub(crate) fn parse_date_time(raw: Option<&str>) -> PocketResult<NaiveDateTime> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(Local::now().naive_local());
    };

    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(date_time);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| {
            PocketError::Validation(format!(
                "Invalid date '{}'. Use YYYY-MM-DD or \"YYYY-MM-DD HH:MM\"",
                raw
            ))
        })
}

pub(crate) fn parse_date(raw: &str) -> PocketResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PocketError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw)))
}

/// `YYYY-MM` or `START..END`; defaults to the current month
pub(crate) fn parse_range(raw: Option<&str>) -> PocketResult<DateRange> {
    match raw {
        None => Ok(Month::current().range()),
        Some(raw) => DateRange::parse(raw).map_err(|e| PocketError::Validation(e.to_string())),
    }
}

/// `NAME:QTY:PRICE`, e.g. `Soap:2:10.00`; the name may itself contain colons
pub(crate) fn parse_line_item(raw: &str) -> PocketResult<LineItem> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(PocketError::Validation(format!(
            "Invalid item '{}'. Use NAME:QTY:PRICE",
            raw
        )));
    };

    FormValidation::new()
        .check("item name", validate_name(name))
        .ensure_valid()?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            PocketError::Validation(format!("item quantity: '{}' is not a positive whole number", quantity))
        })?;
    let price = parse_amount("item price", price)?;

    Ok(LineItem::new(name.trim(), quantity, price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "12.50").unwrap(), Money::from_cents(1250));
        let err = parse_amount("amount", "0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: amount: Amount must be greater than zero"
        );
    }

    #[test]
    fn test_parse_date_time() {
        let parsed = parse_date_time(Some("2025-03-04 18:30")).unwrap();
        assert_eq!(parsed.to_string(), "2025-03-04 18:30:00");
        let parsed = parse_date_time(Some("2025-03-04")).unwrap();
        assert_eq!(parsed.time(), NaiveTime::MIN);
        assert!(parse_date_time(Some("04/03/2025")).is_err());
    }

    #[test]
    fn test_parse_line_item() {
        let item = parse_line_item("Soap:2:10.00").unwrap();
        assert_eq!(item.name, "Soap");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.total(), Money::from_cents(2000));

        let item = parse_line_item("Tea: green:1:3").unwrap();
        assert_eq!(item.name, "Tea: green");

        assert!(parse_line_item("Soap:0:1").is_err());
        assert!(parse_line_item(":1:1").is_err());
        assert!(parse_line_item("Soap").is_err());
    }

    #[test]
    fn test_parse_range_month() {
        let range = parse_range(Some("2025-02")).unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
