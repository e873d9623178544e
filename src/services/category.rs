//! Category service
//!
//! Users see the built-in categories plus their own. Built-ins are
//! read-only; user categories can be renamed and deleted.

use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{Category, CategoryId, CategoryType, UserId};
use crate::storage::Storage;
use crate::validation::{validate_name, FormValidation};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    user: UserId,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    /// Built-in and user categories visible to the user
    pub fn list(&self) -> PocketResult<Vec<Category>> {
        self.storage.categories.filter(|c| c.is_visible_to(self.user))
    }

    pub fn list_by_type(&self, category_type: CategoryType) -> PocketResult<Vec<Category>> {
        self.storage
            .categories
            .filter(|c| c.is_visible_to(self.user) && c.category_type == category_type)
    }

    pub fn get(&self, id: CategoryId) -> PocketResult<Option<Category>> {
        Ok(self
            .storage
            .categories
            .get(id)?
            .filter(|c| c.is_visible_to(self.user)))
    }

    pub fn require(&self, id: CategoryId) -> PocketResult<Category> {
        self.get(id)?
            .ok_or_else(|| PocketError::category_not_found(id.to_string()))
    }

    /// Find by short id, standard key or name
    pub fn find(&self, identifier: &str) -> PocketResult<Option<Category>> {
        let identifier = identifier.trim();
        let visible = self.list()?;

        Ok(visible
            .iter()
            .find(|c| c.id.matches(identifier))
            .or_else(|| {
                visible
                    .iter()
                    .find(|c| c.standard_key.as_deref() == Some(identifier))
            })
            .or_else(|| {
                visible
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(identifier))
            })
            .cloned())
    }

    /// The built-in category with this standard key
    pub fn find_by_standard_key(&self, key: &str) -> PocketResult<Option<Category>> {
        let key = key.trim().to_lowercase();
        self.storage
            .categories
            .find(|c| c.is_built_in() && c.standard_key.as_deref() == Some(key.as_str()))
    }

    pub fn create(
        &self,
        name: &str,
        icon: &str,
        category_type: CategoryType,
    ) -> PocketResult<Category> {
        FormValidation::new()
            .check("name", validate_name(name))
            .ensure_valid()?;
        let name = name.trim();
        self.ensure_unique(name, category_type, None)?;

        let category = Category::new(name, icon.trim(), category_type, self.user);
        category
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.categories.insert(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn rename(&self, id: CategoryId, name: &str) -> PocketResult<Category> {
        let mut category = self.require_owned(id)?;

        FormValidation::new()
            .check("name", validate_name(name))
            .ensure_valid()?;
        let name = name.trim();
        self.ensure_unique(name, category.category_type, Some(id))?;

        category.rename(name);
        self.storage.categories.update(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.id, name = %category.name, "category renamed");
        Ok(category)
    }

    /// Delete a user category
    ///
    /// Transactions that used it become uncategorized and budgets on it are
    /// removed.
    pub fn delete(&self, id: CategoryId) -> PocketResult<Category> {
        let category = self.require_owned(id)?;

        let affected = self
            .storage
            .transactions
            .filter(|t| t.category_id == Some(id))?;
        for mut txn in affected.iter().cloned() {
            txn.set_category(None);
            self.storage.transactions.update(txn)?;
        }

        let budgets = self.storage.budgets.filter(|b| b.category_id == id)?;
        for budget in &budgets {
            self.storage.budgets.delete(budget.id)?;
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;
        if !affected.is_empty() {
            self.storage.transactions.save()?;
        }
        if !budgets.is_empty() {
            self.storage.budgets.save()?;
        }

        info!(
            category = %id,
            uncategorized = affected.len(),
            budgets_removed = budgets.len(),
            "category deleted"
        );
        Ok(category)
    }

    /// A category the user may change
    fn require_owned(&self, id: CategoryId) -> PocketResult<Category> {
        let category = self.require(id)?;
        if category.is_built_in() {
            return Err(PocketError::BuiltInCategory(category.name));
        }
        Ok(category)
    }

    fn ensure_unique(
        &self,
        name: &str,
        category_type: CategoryType,
        except: Option<CategoryId>,
    ) -> PocketResult<()> {
        let clash = self.storage.categories.find(|c| {
            c.is_visible_to(self.user)
                && c.category_type == category_type
                && Some(c.id) != except
                && c.name.eq_ignore_ascii_case(name)
        })?;

        match clash {
            Some(existing) => Err(PocketError::Duplicate {
                entity_type: "Category",
                identifier: existing.name,
            }),
            None => Ok(()),
        }
    }
}
