//! Custom error types for pocket-ledger
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions. Receipt-scan failures have their own
//! taxonomy in [`crate::scan::ScanError`] and are wrapped here when they
//! cross into the service layer.

use thiserror::Error;

use crate::scan::ScanError;

/// The main error type for pocket-ledger operations
#[derive(Error, Debug)]
pub enum PocketError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Attempt to change a category that ships with the app
    #[error("Built-in category '{0}' cannot be modified")]
    BuiltInCategory(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Receipt scan failures
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
}

impl PocketError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for savings goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Savings goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PocketError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PocketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for PocketError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for pocket-ledger operations
pub type PocketResult<T> = Result<T, PocketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PocketError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PocketError::account_not_found("Wallet");
        assert_eq!(err.to_string(), "Account not found: Wallet");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_built_in_category_error() {
        let err = PocketError::BuiltInCategory("Groceries".into());
        assert_eq!(
            err.to_string(),
            "Built-in category 'Groceries' cannot be modified"
        );
    }

    #[test]
    fn test_from_scan_error() {
        let err: PocketError = ScanError::NoTextFound.into();
        assert!(matches!(err, PocketError::Scan(ScanError::NoTextFound)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PocketError = io_err.into();
        assert!(matches!(err, PocketError::Io(_)));
    }
}
