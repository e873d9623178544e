//! Receipt scan failure taxonomy

use thiserror::Error;

/// Why a scan did not produce a [`crate::models::ScanResult`]
///
/// Every variant carries a message suitable for showing to the user, who
/// can retry by starting a new scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Text extraction found nothing readable in the image
    #[error("No text found in the image")]
    NoTextFound,

    /// The structuring service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The response lacked a field a transaction needs
    #[error("Could not read the receipt: {0}")]
    ParsingFailed(String),

    /// The service classified the image as something other than a receipt
    #[error("The image does not look like a receipt")]
    NotAReceipt,

    /// The service was not sure enough of its reading
    #[error("Receipt could not be read reliably (confidence {confidence:.2}, need {threshold:.2})")]
    LowConfidence { confidence: f64, threshold: f64 },

    #[error("Unexpected scan failure: {0}")]
    Unknown(String),
}
