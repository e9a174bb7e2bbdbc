//! Category repository
//!
//! Manages `categories.json`.

use std::path::PathBuf;

use crate::error::FinsightResult;
use crate::models::{Category, CategoryId, UserId};

use super::events::EventBus;
use super::table::JsonTable;

pub struct CategoryRepository {
    table: JsonTable<Category>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: JsonTable::new("categories", path),
        }
    }

    pub fn events(&self) -> &EventBus<Category> {
        self.table.events()
    }

    pub fn load(&self) -> FinsightResult<()> {
        self.table.load().map(|_| ())
    }

    pub fn save(&self) -> FinsightResult<()> {
        self.table.save()
    }

    pub fn get(&self, user_id: UserId, id: CategoryId) -> FinsightResult<Option<Category>> {
        self.table.get(user_id, id)
    }

    /// A user's categories in display order (`order`, then name)
    pub fn get_for_user(&self, user_id: UserId) -> FinsightResult<Vec<Category>> {
        let mut categories = self.table.all_for(user_id)?;
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, user_id: UserId, name: &str) -> FinsightResult<Option<Category>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .table
            .select(user_id, |c| c.name.to_lowercase() == wanted)?
            .into_iter()
            .next())
    }

    /// Highest `order` in use, if the user has any categories
    pub fn max_order(&self, user_id: UserId) -> FinsightResult<Option<i32>> {
        Ok(self.table.all_for(user_id)?.iter().map(|c| c.order).max())
    }

    pub fn upsert(&self, category: Category) -> FinsightResult<()> {
        self.table.upsert(category).map(|_| ())
    }

    pub fn delete(&self, user_id: UserId, id: CategoryId) -> FinsightResult<Option<Category>> {
        self.table.delete(user_id, id)
    }

    pub fn count(&self, user_id: UserId) -> FinsightResult<usize> {
        self.table.count_for(user_id)
    }
}
