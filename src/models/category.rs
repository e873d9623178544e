//! Category model
//!
//! Categories classify transactions. Built-in categories ship with the app,
//! carry a stable standard key and have no owning user; user-defined
//! categories belong to exactly one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};

/// Whether a category classifies spending or earnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[default]
    Expense,
    Income,
}

impl CategoryType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Icon reference understood by the front end
    #[serde(default)]
    pub icon: String,

    #[serde(rename = "type")]
    pub category_type: CategoryType,

    /// Stable identifier of a built-in category, e.g. "groceries"
    #[serde(default)]
    pub standard_key: Option<String>,

    /// Owning user; None for built-in categories
    #[serde(default)]
    pub owner_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a user-defined category
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        category_type: CategoryType,
        owner_id: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: icon.into(),
            category_type,
            standard_key: None,
            owner_id: Some(owner_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a built-in category from its standard definition
    pub fn built_in(standard: &StandardCategory) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: standard.name.to_string(),
            icon: standard.icon.to_string(),
            category_type: standard.category_type,
            standard_key: Some(standard.key.to_string()),
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Built-in categories have no owner and are read-only
    pub fn is_built_in(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Whether `user` may see and use this category
    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.owner_id.map_or(true, |owner| owner == user)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        if self.is_built_in() && self.standard_key.is_none() {
            return Err(CategoryValidationError::BuiltInWithoutKey);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Definition of a built-in category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardCategory {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub category_type: CategoryType,
}

const fn standard(
    key: &'static str,
    name: &'static str,
    icon: &'static str,
    category_type: CategoryType,
) -> StandardCategory {
    StandardCategory {
        key,
        name,
        icon,
        category_type,
    }
}

/// Categories seeded on first run
pub const STANDARD_CATEGORIES: &[StandardCategory] = &[
    standard("food_drink", "Food & Drink", "ic_food", CategoryType::Expense),
    standard("groceries", "Groceries", "ic_groceries", CategoryType::Expense),
    standard("transportation", "Transportation", "ic_transport", CategoryType::Expense),
    standard("shopping", "Shopping", "ic_shopping", CategoryType::Expense),
    standard("entertainment", "Entertainment", "ic_entertainment", CategoryType::Expense),
    standard("bills_utilities", "Bills & Utilities", "ic_bills", CategoryType::Expense),
    standard("health", "Health", "ic_health", CategoryType::Expense),
    standard("education", "Education", "ic_education", CategoryType::Expense),
    standard("other_expense", "Other Expense", "ic_other", CategoryType::Expense),
    standard("salary", "Salary", "ic_salary", CategoryType::Income),
    standard("bonus", "Bonus", "ic_bonus", CategoryType::Income),
    standard("gift", "Gift", "ic_gift", CategoryType::Income),
    standard("investment", "Investment", "ic_investment", CategoryType::Income),
    standard("other_income", "Other Income", "ic_other", CategoryType::Income),
];

/// Look up a built-in category definition by its standard key
pub fn standard_category(key: &str) -> Option<&'static StandardCategory> {
    let key = key.trim();
    STANDARD_CATEGORIES
        .iter()
        .find(|c| c.key.eq_ignore_ascii_case(key))
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,

    #[error("Category name too long ({0} chars, max 50)")]
    NameTooLong(usize),

    #[error("Built-in categories need a standard key")]
    BuiltInWithoutKey,
}
