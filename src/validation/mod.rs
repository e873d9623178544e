//! Input validation rules shared by every form

pub mod form;
pub mod rules;

pub use form::FormValidation;
pub use rules::{
    validate_amount, validate_email, validate_name, validate_password,
    validate_password_confirmation, ValidationResult,
};
