//! Recurring transaction service
//!
//! Templates are stored and listed only; nothing turns them into real
//! transactions automatically.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{
    CategoryId, Frequency, Money, RecurringId, RecurringTransaction, TransactionKind, UserId,
};
use crate::storage::Storage;

use super::resolve_short;

/// Service for recurring transaction templates
pub struct RecurringService<'a> {
    storage: &'a Storage,
    user_id: UserId,
}

/// Input for creating a template
#[derive(Debug, Clone)]
pub struct CreateRecurringInput {
    pub name: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category_id: CategoryId,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self { storage, user_id }
    }

    pub fn create(&self, input: CreateRecurringInput) -> FinsightResult<RecurringTransaction> {
        self.storage
            .categories
            .get(self.user_id, input.category_id)?
            .ok_or_else(|| FinsightError::category_not_found(input.category_id.to_string()))?;

        let template = RecurringTransaction::new(
            self.user_id,
            input.name.trim(),
            input.kind,
            input.amount,
            input.category_id,
            input.frequency,
            input.next_date,
        );
        template
            .validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.recurring.upsert(template.clone())?;
        self.storage.recurring.save()?;

        self.storage.log_create(
            EntityType::RecurringTransaction,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        info!(id = %template.id, name = %template.name, frequency = %template.frequency, "recurring template created");
        Ok(template)
    }

    pub fn get(&self, id: RecurringId) -> FinsightResult<Option<RecurringTransaction>> {
        self.storage.recurring.get(self.user_id, id)
    }

    /// Find a template by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> FinsightResult<Option<RecurringTransaction>> {
        let templates = self.list()?;
        let wanted = identifier.trim().to_lowercase();
        if let Some(t) = templates.iter().find(|t| t.name.to_lowercase() == wanted) {
            return Ok(Some(t.clone()));
        }

        if let Ok(id) = identifier.trim().parse::<RecurringId>() {
            return self.get(id);
        }

        resolve_short(templates, identifier, "Recurring transaction", |id, s| {
            id.matches_short(s)
        })
    }

    fn require(&self, identifier: &str) -> FinsightResult<RecurringTransaction> {
        self.find(identifier)?
            .ok_or_else(|| FinsightError::recurring_not_found(identifier))
    }

    /// Templates ordered by next date
    pub fn list(&self) -> FinsightResult<Vec<RecurringTransaction>> {
        self.storage.recurring.get_for_user(self.user_id)
    }

    fn set_active(&self, identifier: &str, active: bool) -> FinsightResult<RecurringTransaction> {
        let mut template = self.require(identifier)?;
        if template.is_active() == active {
            return Ok(template);
        }

        let before = template.clone();
        if active {
            template.resume();
        } else {
            template.pause();
        }

        self.storage.recurring.upsert(template.clone())?;
        self.storage.recurring.save()?;

        self.storage.log_update(
            EntityType::RecurringTransaction,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;

        info!(id = %template.id, status = %template.status, "recurring template status changed");
        Ok(template)
    }

    pub fn pause(&self, identifier: &str) -> FinsightResult<RecurringTransaction> {
        self.set_active(identifier, false)
    }

    pub fn resume(&self, identifier: &str) -> FinsightResult<RecurringTransaction> {
        self.set_active(identifier, true)
    }

    pub fn delete(&self, identifier: &str) -> FinsightResult<RecurringTransaction> {
        let template = self.require(identifier)?;

        self.storage.recurring.delete(self.user_id, template.id)?;
        self.storage.recurring.save()?;

        self.storage.log_delete(
            EntityType::RecurringTransaction,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        info!(id = %template.id, "recurring template deleted");
        Ok(template)
    }

    /// Active templates due within `days` of `today`, overdue ones included
    pub fn upcoming(&self, today: NaiveDate, days: i64) -> FinsightResult<Vec<RecurringTransaction>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.is_due_within(today, days))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RecurringStatus};
    use crate::services::test_support::{create_test_storage, test_user};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn input(category_id: CategoryId, name: &str, next_date: NaiveDate) -> CreateRecurringInput {
        CreateRecurringInput {
            name: name.to_string(),
            kind: TransactionKind::Expense,
            amount: Money::from_units(15),
            category_id,
            frequency: Frequency::Monthly,
            next_date,
        }
    }

    fn setup(storage: &Storage, user: UserId) -> CategoryId {
        let category = Category::new(user, "Subscriptions");
        let id = category.id;
        storage.categories.upsert(category).unwrap();
        id
    }

    #[test]
    fn test_create_and_list() {
        let (_temp, storage) = create_test_storage();
        let user = test_user();
        let cat = setup(&storage, user);
        let service = RecurringService::new(&storage, user);

        service.create(input(cat, "Music", date(3, 20))).unwrap();
        service.create(input(cat, "Video", date(3, 5))).unwrap();

        let names: Vec<String> = service.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["Video", "Music"]);
    }

    #[test]
    fn test_create_requires_category() {
        let (_temp, storage) = create_test_storage();
        let service = RecurringService::new(&storage, test_user());
        let err = service
            .create(input(CategoryId::new(), "Music", date(3, 20)))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pause_and_resume() {
        let (_temp, storage) = create_test_storage();
        let user = test_user();
        let cat = setup(&storage, user);
        let service = RecurringService::new(&storage, user);
        service.create(input(cat, "Music", date(3, 20))).unwrap();

        assert_eq!(service.pause("music").unwrap().status, RecurringStatus::Paused);
        // pausing twice is a no-op and writes no audit entry
        service.pause("music").unwrap();
        assert_eq!(storage.audit().entry_count().unwrap(), 2);

        assert_eq!(service.resume("Music").unwrap().status, RecurringStatus::Active);
    }

    #[test]
    fn test_upcoming_skips_paused_and_far_off() {
        let (_temp, storage) = create_test_storage();
        let user = test_user();
        let cat = setup(&storage, user);
        let service = RecurringService::new(&storage, user);

        service.create(input(cat, "Soon", date(3, 3))).unwrap();
        service.create(input(cat, "Overdue", date(2, 25))).unwrap();
        service.create(input(cat, "Later", date(4, 20))).unwrap();
        service.create(input(cat, "Paused", date(3, 2))).unwrap();
        service.pause("Paused").unwrap();

        let due: Vec<String> = service
            .upcoming(date(3, 1), 7)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(due, ["Overdue", "Soon"]);
    }

    #[test]
    fn test_delete() {
        let (_temp, storage) = create_test_storage();
        let user = test_user();
        let cat = setup(&storage, user);
        let service = RecurringService::new(&storage, user);
        let created = service.create(input(cat, "Music", date(3, 20))).unwrap();

        service.delete(&created.id.to_string()).unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
