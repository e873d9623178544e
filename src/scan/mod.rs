//! Receipt scanning
//!
//! Turns a photographed receipt into a [`crate::models::ScanResult`] that
//! pre-fills a new transaction. The pipeline depends on two collaborators
//! passed in by the caller:
//!
//! - a [`TextExtractor`] for on-device OCR output,
//! - a [`ReceiptStructurer`] for the generative-AI call that reads
//!   merchant, amount, date and category out of that text.

pub mod command;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod structurer;

pub use command::{CommandStructurer, ResponseFileStructurer};
pub use error::ScanError;
pub use extractor::{ReceiptImage, SidecarTextExtractor, TextExtractor};
pub use orchestrator::{ScanOrchestrator, DEFAULT_CONFIDENCE_THRESHOLD};
pub use structurer::{
    build_prompt, parse_response, ReceiptStructurer, StructuredItem, StructuredReceipt,
    StructuringError, StructuringRequest,
};
