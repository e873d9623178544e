//! Receipt scan pipeline
//!
//! extract text → structure it remotely → assemble a [`ScanResult`].
//! The stages run strictly in order, nothing is retried and the first
//! failure is returned to the caller unchanged.

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use crate::models::{standard_category, LineItem, ScanResult, UserId};

use super::error::ScanError;
use super::extractor::{ReceiptImage, TextExtractor};
use super::structurer::{ReceiptStructurer, StructuredReceipt, StructuringError, StructuringRequest};

/// Confidence below which a reading is rejected
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Coordinates text extraction and remote structuring for one scan
pub struct ScanOrchestrator<E, S> {
    extractor: E,
    structurer: S,
    confidence_threshold: f64,
}

impl<E: TextExtractor, S: ReceiptStructurer> ScanOrchestrator<E, S> {
    pub fn new(extractor: E, structurer: S) -> Self {
        Self {
            extractor,
            structurer,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Override the minimum accepted confidence (clamped to 0.0 - 1.0)
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Run the full pipeline for one captured image
    pub fn scan(&self, image: &ReceiptImage, user_id: Option<UserId>) -> Result<ScanResult, ScanError> {
        let text = self
            .extractor
            .extract_text(image)?
            .filter(|text| !text.trim().is_empty())
            .ok_or(ScanError::NoTextFound)
            .inspect_err(|_| warn!(image = %image.reference(), "no text extracted"))?;
        debug!(chars = text.len(), "text extracted");

        let request = StructuringRequest { text, user_id };
        let structured = self.structurer.structure(&request).map_err(|e| match e {
            StructuringError::Network(msg) => ScanError::Network(msg),
            StructuringError::InvalidResponse(msg) => ScanError::ParsingFailed(msg),
            StructuringError::Service(msg) => ScanError::Unknown(msg),
        })?;
        debug!(
            confidence = ?structured.confidence,
            is_receipt = ?structured.is_receipt,
            "receipt structured"
        );

        let mut result = self.assemble(structured)?;
        result.receipt_image = Some(image.reference());

        info!(
            merchant = result.merchant_name.as_deref().unwrap_or("-"),
            total = %result.total_amount,
            items = result.line_items.len(),
            "receipt scanned"
        );
        Ok(result)
    }

    fn assemble(&self, structured: StructuredReceipt) -> Result<ScanResult, ScanError> {
        if structured.is_receipt == Some(false) {
            warn!("service classified image as not a receipt");
            return Err(ScanError::NotAReceipt);
        }

        if let Some(confidence) = structured.confidence {
            if confidence < self.confidence_threshold {
                warn!(confidence, threshold = self.confidence_threshold, "low confidence reading");
                return Err(ScanError::LowConfidence {
                    confidence,
                    threshold: self.confidence_threshold,
                });
            }
        }

        let total_amount = structured
            .total_amount
            .filter(|amount| amount.is_positive())
            .ok_or_else(|| ScanError::ParsingFailed("missing total amount".into()))?;
        let date = structured
            .date
            .ok_or_else(|| ScanError::ParsingFailed("missing transaction date".into()))?;
        let time = structured.time.unwrap_or(NaiveTime::MIN);

        // Keep only keys that name a built-in category
        let category_key = structured
            .category
            .as_deref()
            .and_then(standard_category)
            .map(|c| c.key.to_string());

        let line_items = structured
            .items
            .into_iter()
            .map(|item| LineItem::new(item.name, item.quantity, item.price))
            .collect();

        Ok(ScanResult {
            merchant_name: structured.merchant_name,
            date_time: NaiveDateTime::new(date, time),
            total_amount,
            category_key,
            line_items,
            receipt_image: None,
        })
    }
}
