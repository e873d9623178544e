//! Per-form collection of rule outcomes
//!
//! Every field is validated independently; the save action is blocked while
//! any field has an error.

use crate::error::{PocketError, PocketResult};

use super::rules::ValidationResult;

/// Named rule results for one form, in the order they were checked
#[derive(Debug, Clone, Default)]
pub struct FormValidation {
    fields: Vec<(&'static str, ValidationResult)>,
}

impl FormValidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for `field`
    pub fn check(mut self, field: &'static str, result: ValidationResult) -> Self {
        self.fields.push((field, result));
        self
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|(_, r)| !r.successful)
    }

    /// Result recorded for a field
    pub fn field(&self, field: &str) -> Option<&ValidationResult> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, r)| r)
    }

    /// All failures as (field, message)
    pub fn errors(&self) -> Vec<(&'static str, &str)> {
        self.fields
            .iter()
            .filter_map(|(name, r)| r.error_message.as_deref().map(|m| (*name, m)))
            .collect()
    }

    pub fn first_error(&self) -> Option<(&'static str, &str)> {
        self.errors().into_iter().next()
    }

    /// Turn the first failure into a validation error
    pub fn ensure_valid(&self) -> PocketResult<()> {
        match self.first_error() {
            Some((field, message)) => Err(PocketError::Validation(format!("{}: {}", field, message))),
            None => Ok(()),
        }
    }
}
