//! Category service
//!
//! Provides business logic for category management including CRUD
//! operations, duplicate-name checks and the default seed.

use chrono::Utc;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{Category, CategoryId, UserId};
use crate::storage::{seed_default_categories, Storage};

use super::resolve_short;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    user_id: UserId,
}

/// Fields to change on a category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self { storage, user_id }
    }

    fn ensure_unique_name(&self, name: &str, except: Option<CategoryId>) -> FinsightResult<()> {
        if let Some(existing) = self.storage.categories.get_by_name(self.user_id, name)? {
            if Some(existing.id) != except {
                return Err(FinsightError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create a new category at the end of the sort order
    pub fn create(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> FinsightResult<Category> {
        let name = name.trim();
        self.ensure_unique_name(name, None)?;

        let order = self
            .storage
            .categories
            .max_order(self.user_id)?
            .map_or(0, |max| max + 1);

        let mut category = Category::new(self.user_id, name).with_order(order);
        if let Some(icon) = icon {
            category.icon = icon.to_string();
        }
        if let Some(color) = color {
            category.color = color.to_string();
        }

        category
            .validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> FinsightResult<Option<Category>> {
        self.storage.categories.get(self.user_id, id)
    }

    /// Find a category by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> FinsightResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(self.user_id, identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return self.get(id);
        }

        resolve_short(self.list()?, identifier, "Category", |id, s| id.matches_short(s))
    }

    /// Find a category or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> FinsightResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| FinsightError::category_not_found(identifier))
    }

    /// All categories in display order
    pub fn list(&self) -> FinsightResult<Vec<Category>> {
        self.storage.categories.get_for_user(self.user_id)
    }

    pub fn update(&self, identifier: &str, changes: CategoryUpdate) -> FinsightResult<Category> {
        let mut category = self.require(identifier)?;
        let before = category.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            self.ensure_unique_name(&name, Some(category.id))?;
            category.name = name;
        }
        if let Some(icon) = changes.icon {
            category.icon = icon;
        }
        if let Some(color) = changes.color {
            category.color = color;
        }
        if let Some(order) = changes.order {
            category.order = order;
        }

        category.updated_at = Utc::now();
        category
            .validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        info!(id = %category.id, "category updated");
        Ok(category)
    }

    /// Delete a category. Refused while any transaction still uses it.
    pub fn delete(&self, identifier: &str) -> FinsightResult<Category> {
        let category = self.require(identifier)?;

        let in_use = self
            .storage
            .transactions
            .get_by_category(self.user_id, category.id)?
            .len();
        if in_use > 0 {
            return Err(FinsightError::Validation(format!(
                "Cannot delete category '{}' - {} transactions use it",
                category.name, in_use
            )));
        }

        let allocated = self
            .storage
            .budgets
            .get_for_user(self.user_id)?
            .iter()
            .filter(|b| b.allocation_for(category.id).is_some())
            .count();
        if allocated > 0 {
            warn!(
                category = %category.name,
                budgets = allocated,
                "deleting a category that budgets still allocate to"
            );
        }

        self.storage.categories.delete(self.user_id, category.id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        info!(id = %category.id, "category deleted");
        Ok(category)
    }

    /// Seed the default categories if the user has none
    pub fn seed_defaults(&self) -> FinsightResult<Vec<Category>> {
        let seeded = seed_default_categories(self.storage, self.user_id)?;
        for category in &seeded {
            self.storage.log_create(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                category,
            )?;
        }
        Ok(seeded)
    }
}
