//! Field validators
//!
//! Each rule maps raw input to a [`ValidationResult`]. Rules never panic and
//! never fail with an error; an absent message means the input is valid.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::Money;

/// Longest accepted name for accounts, categories and goals
pub const MAX_NAME_LENGTH: usize = 50;

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Outcome of a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub successful: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            successful: true,
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            error_message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.successful
    }
}

/// A display name: not blank, at most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(name: &str) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return ValidationResult::error("Name cannot be empty");
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return ValidationResult::error(format!(
            "Name cannot be longer than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    ValidationResult::ok()
}

/// A money amount typed by the user; must be greater than zero
pub fn validate_amount(amount: &str) -> ValidationResult {
    if amount.trim().is_empty() {
        return ValidationResult::error("Amount cannot be empty");
    }
    match Money::parse(amount) {
        Ok(money) if money.is_positive() => ValidationResult::ok(),
        Ok(_) => ValidationResult::error("Amount must be greater than zero"),
        Err(_) => ValidationResult::error("Amount must be a valid number"),
    }
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return ValidationResult::error("Email cannot be empty");
    }
    if !EMAIL_PATTERN.is_match(email) {
        return ValidationResult::error("Email address is not valid");
    }
    ValidationResult::ok()
}

/// At least [`MIN_PASSWORD_LENGTH`] characters with a letter and a digit
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::error("Password cannot be empty");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return ValidationResult::error(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return ValidationResult::error("Password must contain at least one letter and one digit");
    }
    ValidationResult::ok()
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if confirmation.is_empty() {
        return ValidationResult::error("Please confirm your password");
    }
    if password != confirmation {
        return ValidationResult::error("Passwords do not match");
    }
    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_fails_with_message() {
        for blank in ["", " ", "\t\n"] {
            let result = validate_name(blank);
            assert!(!result.successful);
            assert_eq!(result.error_message.as_deref(), Some("Name cannot be empty"));
        }
    }

    #[test]
    fn test_short_name_succeeds() {
        let result = validate_name("A");
        assert!(result.successful);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_long_name_fails() {
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(!validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_ok());
    }

    #[test]
    fn test_amount() {
        assert!(validate_amount("12.50").is_ok());
        assert!(validate_amount("50,000").is_ok());
        assert_eq!(
            validate_amount("").error_message.as_deref(),
            Some("Amount cannot be empty")
        );
        assert_eq!(
            validate_amount("0").error_message.as_deref(),
            Some("Amount must be greater than zero")
        );
        assert_eq!(
            validate_amount("-5").error_message.as_deref(),
            Some("Amount must be greater than zero")
        );
        assert_eq!(
            validate_amount("ten").error_message.as_deref(),
            Some("Amount must be a valid number")
        );
        assert_eq!(
            validate_amount("ten5").error_message.as_deref(),
            Some("Amount must be a valid number")
        );
        assert!(!validate_amount("abc12").is_ok());
        assert!(validate_amount("$12").is_ok());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email(" first.last+tag@mail.co.id ").is_ok());
        assert!(!validate_email("").is_ok());
        assert!(!validate_email("ana@").is_ok());
        assert!(!validate_email("ana example.com").is_ok());
        assert!(!validate_email("ana@example").is_ok());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("hunter22a").is_ok());
        assert!(!validate_password("").is_ok());
        assert!(!validate_password("a1b2c3").is_ok());
        assert!(!validate_password("onlyletters").is_ok());
        assert!(!validate_password("1234567890").is_ok());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("secret123", "secret123").is_ok());
        assert_eq!(
            validate_password_confirmation("secret123", "secret124")
                .error_message
                .as_deref(),
            Some("Passwords do not match")
        );
        assert!(!validate_password_confirmation("secret123", "").is_ok());
    }
}
