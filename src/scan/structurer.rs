//! Remote structuring of receipt text
//!
//! A generative model turns raw OCR text into a small JSON document. Models
//! are loose about formatting, so every field here is optional and
//! malformed values are dropped rather than rejected. Deciding which
//! missing fields are fatal is left to the orchestrator.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Money, StandardCategory, UserId};

/// What gets sent to the structuring service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringRequest {
    pub text: String,
    /// Lets the service personalise its guesses
    pub user_id: Option<UserId>,
}

/// Failures reported by a [`ReceiptStructurer`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuringError {
    #[error("service unreachable: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service error: {0}")]
    Service(String),
}

/// Service that turns receipt text into structured fields
pub trait ReceiptStructurer {
    fn structure(&self, request: &StructuringRequest) -> Result<StructuredReceipt, StructuringError>;
}

impl<T: ReceiptStructurer + ?Sized> ReceiptStructurer for Box<T> {
    fn structure(&self, request: &StructuringRequest) -> Result<StructuredReceipt, StructuringError> {
        (**self).structure(request)
    }
}

/// One itemised line as read by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredItem {
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

/// The service's reading of a receipt, every field optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredReceipt {
    pub merchant_name: Option<String>,
    pub total_amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// Standard key of the guessed category
    pub category: Option<String>,
    pub items: Vec<StructuredItem>,
    /// `Some(false)` when the service says the image is not a receipt
    pub is_receipt: Option<bool>,
    /// 0.0 - 1.0
    pub confidence: Option<f64>,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%H.%M"];

/// Parse the JSON body returned by a structuring service
///
/// Markdown code fences around the document are tolerated.
pub fn parse_response(body: &str) -> Result<StructuredReceipt, StructuringError> {
    let json = strip_code_fence(body);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| StructuringError::InvalidResponse(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| StructuringError::InvalidResponse("expected a JSON object".into()))?;

    Ok(StructuredReceipt {
        merchant_name: field(object, &["merchant_name", "merchantName", "merchant"])
            .and_then(as_text),
        total_amount: field(object, &["total_amount", "totalAmount", "total"]).and_then(as_money),
        date: field(object, &["date", "transaction_date"])
            .and_then(as_text)
            .and_then(|s| parse_with(&s, DATE_FORMATS, NaiveDate::parse_from_str)),
        time: field(object, &["time", "transaction_time"])
            .and_then(as_text)
            .and_then(|s| parse_with(&s, TIME_FORMATS, NaiveTime::parse_from_str)),
        category: field(object, &["category", "category_key", "categoryKey"])
            .and_then(as_text)
            .map(|s| s.to_lowercase()),
        items: field(object, &["items", "line_items", "lineItems"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(as_item).collect())
            .unwrap_or_default(),
        is_receipt: field(object, &["is_receipt", "isReceipt"]).and_then(as_bool),
        confidence: field(object, &["confidence"]).and_then(as_f64),
    })
}

/// Prompt asking a generative model for the JSON shape [`parse_response`] reads
pub fn build_prompt(text: &str, categories: &[StandardCategory]) -> String {
    let keys: Vec<&str> = categories.iter().map(|c| c.key).collect();
    format!(
        r#"You read shop receipts and return their contents as JSON.

Receipt text:
"""
{text}
"""

Answer with a single JSON object and nothing else:
{{
  "is_receipt": true or false,
  "confidence": number between 0 and 1,
  "merchant_name": string,
  "total_amount": number (the final amount paid),
  "date": "YYYY-MM-DD",
  "time": "HH:MM",
  "category": one of [{keys}],
  "items": [{{"name": string, "quantity": integer, "price": unit price as number}}]
}}
Use null for anything you cannot read."#,
        text = text.trim(),
        keys = keys
            .iter()
            .map(|k| format!("\"{}\"", k))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|v| !v.is_null())
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn as_money(value: &Value) -> Option<Money> {
    let raw = match value {
        // Number's own rendering keeps the decimal digits exact
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Money::parse(&raw).ok()
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn as_quantity(value: Option<&Value>) -> Option<u32> {
    match value {
        None => Some(1),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|q| u32::try_from(q).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

fn as_item(value: &Value) -> Option<StructuredItem> {
    let object = value.as_object()?;
    let name = field(object, &["name", "description"]).and_then(as_text)?;
    let quantity = as_quantity(field(object, &["quantity", "qty"]))?;
    let price = field(object, &["price", "unit_price", "unitPrice"]).and_then(as_money)?;
    if quantity == 0 || price.is_negative() || price.checked_times(quantity).is_none() {
        return None;
    }
    Some(StructuredItem {
        name,
        quantity,
        price,
    })
}

fn parse_with<T>(
    raw: &str,
    formats: &[&str],
    parse: fn(&str, &str) -> chrono::ParseResult<T>,
) -> Option<T> {
    formats.iter().find_map(|format| parse(raw.trim(), format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STANDARD_CATEGORIES;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "is_receipt": true,
            "confidence": 0.92,
            "merchant_name": "Toko Makmur",
            "total_amount": 54000,
            "date": "2025-03-14",
            "time": "18:42",
            "category": "Groceries",
            "items": [
                {"name": "Rice 5kg", "quantity": 1, "price": 50000},
                {"name": "Egg", "quantity": "2", "price": "2000.00"}
            ]
        }"#;

        let receipt = parse_response(body).unwrap();
        assert_eq!(receipt.merchant_name.as_deref(), Some("Toko Makmur"));
        assert_eq!(receipt.total_amount, Some(Money::from_cents(5400000)));
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(receipt.time, NaiveTime::from_hms_opt(18, 42, 0));
        assert_eq!(receipt.category.as_deref(), Some("groceries"));
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[1].quantity, 2);
        assert_eq!(receipt.items[1].price, Money::from_cents(200000));
        assert_eq!(receipt.is_receipt, Some(true));
        assert_eq!(receipt.confidence, Some(0.92));
    }

    #[test]
    fn test_decimal_total_is_exact() {
        let receipt = parse_response(r#"{"total_amount": 19.99}"#).unwrap();
        assert_eq!(receipt.total_amount, Some(Money::from_cents(1999)));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let body = "```json\n{\"merchant\": \"Cafe\", \"total\": \"12.50\"}\n```";
        let receipt = parse_response(body).unwrap();
        assert_eq!(receipt.merchant_name.as_deref(), Some("Cafe"));
        assert_eq!(receipt.total_amount, Some(Money::from_cents(1250)));
    }

    #[test]
    fn test_malformed_fields_are_dropped() {
        let body = r#"{
            "merchant_name": null,
            "total_amount": "about ten",
            "date": "sometime",
            "time": 7,
            "items": [
                {"name": "Free sample", "quantity": 0, "price": 1},
                {"name": "No price", "quantity": 1},
                {"name": "Gum", "price": 1.5},
                "garbage"
            ],
            "confidence": "high"
        }"#;

        let receipt = parse_response(body).unwrap();
        assert!(receipt.merchant_name.is_none());
        assert!(receipt.total_amount.is_none());
        assert!(receipt.date.is_none());
        assert!(receipt.time.is_none());
        assert!(receipt.confidence.is_none());
        assert_eq!(
            receipt.items,
            vec![StructuredItem {
                name: "Gum".into(),
                quantity: 1,
                price: Money::from_cents(150),
            }]
        );
    }

    #[test]
    fn test_item_with_overflowing_total_is_dropped() {
        let body = r#"{
            "total_amount": 3.0,
            "items": [
                {"name": "x", "quantity": 2, "price": 90000000000000000},
                {"name": "Tea", "quantity": 2, "price": 1.5}
            ]
        }"#;

        let receipt = parse_response(body).unwrap();
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Tea");
    }

    #[test]
    fn test_non_finite_confidence_is_dropped() {
        for raw in ["\"NaN\"", "\"inf\"", "\"-inf\""] {
            let body = format!(r#"{{"confidence": {}}}"#, raw);
            assert!(parse_response(&body).unwrap().confidence.is_none());
        }
    }

    #[test]
    fn test_day_first_dates() {
        let receipt = parse_response(r#"{"date": "05/04/2025", "time": "09:30:15"}"#).unwrap();
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2025, 4, 5));
        assert_eq!(receipt.time, NaiveTime::from_hms_opt(9, 30, 15));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_response("Sorry, I cannot help with that."),
            Err(StructuringError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response("[1, 2]"),
            Err(StructuringError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_prompt_lists_category_keys() {
        let prompt = build_prompt("  TOTAL 10.00  ", STANDARD_CATEGORIES);
        assert!(prompt.contains("TOTAL 10.00"));
        assert!(prompt.contains("\"food_drink\""));
        assert!(prompt.contains("\"other_income\""));
    }
}
