//! Recurring template repository
//!
//! Manages `recurring.json` (the `recurring_transactions` table).

use std::path::PathBuf;

use crate::error::FinsightResult;
use crate::models::{RecurringId, RecurringTransaction, UserId};

use super::events::EventBus;
use super::table::JsonTable;

pub struct RecurringRepository {
    table: JsonTable<RecurringTransaction>,
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: JsonTable::new("recurring_transactions", path),
        }
    }

    pub fn events(&self) -> &EventBus<RecurringTransaction> {
        self.table.events()
    }

    pub fn load(&self) -> FinsightResult<()> {
        self.table.load().map(|_| ())
    }

    pub fn save(&self) -> FinsightResult<()> {
        self.table.save()
    }

    pub fn get(&self, user_id: UserId, id: RecurringId) -> FinsightResult<Option<RecurringTransaction>> {
        self.table.get(user_id, id)
    }

    /// A user's templates ordered by next due date
    pub fn get_for_user(&self, user_id: UserId) -> FinsightResult<Vec<RecurringTransaction>> {
        let mut templates = self.table.all_for(user_id)?;
        templates.sort_by(|a, b| a.next_date.cmp(&b.next_date).then_with(|| a.name.cmp(&b.name)));
        Ok(templates)
    }

    pub fn upsert(&self, template: RecurringTransaction) -> FinsightResult<()> {
        self.table.upsert(template).map(|_| ())
    }

    pub fn delete(&self, user_id: UserId, id: RecurringId) -> FinsightResult<Option<RecurringTransaction>> {
        self.table.delete(user_id, id)
    }
}
