//! Transaction repository
//!
//! Manages `transactions.json` and keeps a category index so category
//! deletes can check for references without scanning every row.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{FinsightError, FinsightResult};
use crate::models::{CategoryId, MonthKey, Transaction, TransactionId, UserId};

use super::events::EventBus;
use super::table::JsonTable;

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    table: JsonTable<Transaction>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

pub(crate) fn newest_first(rows: &mut [Transaction]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: JsonTable::new("transactions", path),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    pub fn events(&self) -> &EventBus<Transaction> {
        self.table.events()
    }

    fn index_write(
        &self,
    ) -> FinsightResult<std::sync::RwLockWriteGuard<'_, HashMap<CategoryId, Vec<TransactionId>>>> {
        self.by_category
            .write()
            .map_err(|e| FinsightError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk and rebuild the category index
    pub fn load(&self) -> FinsightResult<()> {
        let rows = self.table.load()?;

        let mut by_category = self.index_write()?;
        by_category.clear();
        for txn in rows {
            by_category.entry(txn.category_id).or_default().push(txn.id);
        }

        Ok(())
    }

    pub fn save(&self) -> FinsightResult<()> {
        self.table.save()
    }

    pub fn get(&self, user_id: UserId, id: TransactionId) -> FinsightResult<Option<Transaction>> {
        self.table.get(user_id, id)
    }

    /// All of a user's transactions, newest first
    pub fn get_for_user(&self, user_id: UserId) -> FinsightResult<Vec<Transaction>> {
        let mut rows = self.table.all_for(user_id)?;
        newest_first(&mut rows);
        Ok(rows)
    }

    /// Transactions dated within `[start, end]`, newest first
    pub fn get_by_date_range(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FinsightResult<Vec<Transaction>> {
        let mut rows = self
            .table
            .select(user_id, |t| t.date >= start && t.date <= end)?;
        newest_first(&mut rows);
        Ok(rows)
    }

    /// Transactions in one calendar month, newest first
    pub fn get_for_month(&self, user_id: UserId, month: MonthKey) -> FinsightResult<Vec<Transaction>> {
        self.get_by_date_range(user_id, month.first_day(), month.last_day())
    }

    /// Transactions filed under a category, via the index
    pub fn get_by_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
    ) -> FinsightResult<Vec<Transaction>> {
        let ids = self
            .by_category
            .read()
            .map_err(|e| FinsightError::Storage(format!("Failed to acquire read lock: {}", e)))?
            .get(&category_id)
            .cloned()
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(txn) = self.table.get(user_id, id)? {
                rows.push(txn);
            }
        }
        newest_first(&mut rows);
        Ok(rows)
    }

    /// Whether any of the user's transactions reference a category
    pub fn references_category(&self, user_id: UserId, category_id: CategoryId) -> FinsightResult<bool> {
        Ok(!self.get_by_category(user_id, category_id)?.is_empty())
    }

    /// Insert or update a transaction, moving it between index buckets
    pub fn upsert(&self, txn: Transaction) -> FinsightResult<()> {
        let id = txn.id;
        let category_id = txn.category_id;
        let previous = self.table.upsert(txn)?;

        let mut by_category = self.index_write()?;
        if let Some(old) = previous {
            if let Some(ids) = by_category.get_mut(&old.category_id) {
                ids.retain(|&t| t != id);
            }
        }
        by_category.entry(category_id).or_default().push(id);

        Ok(())
    }

    /// Delete a transaction; returns the removed row
    pub fn delete(&self, user_id: UserId, id: TransactionId) -> FinsightResult<Option<Transaction>> {
        let removed = self.table.delete(user_id, id)?;

        if let Some(txn) = &removed {
            let mut by_category = self.index_write()?;
            if let Some(ids) = by_category.get_mut(&txn.category_id) {
                ids.retain(|&t| t != id);
            }
        }

        Ok(removed)
    }

    /// Delete several transactions; unknown IDs are skipped
    pub fn delete_many(&self, user_id: UserId, ids: &[TransactionId]) -> FinsightResult<Vec<Transaction>> {
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(txn) = self.delete(user_id, id)? {
                removed.push(txn);
            }
        }
        Ok(removed)
    }

    pub fn count(&self, user_id: UserId) -> FinsightResult<usize> {
        self.table.count_for(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count(UserId::new()).unwrap(), 0);
    }

    #[test]
    fn test_month_filter_is_inclusive() {
        let (_temp, repo) = create_test_repo();
        let user = UserId::new();
        let cat = CategoryId::new();

        for d in [date(1, 1), date(1, 31), date(2, 1), date(12, 31)] {
            repo.upsert(Transaction::expense(user, Money::from_units(1), cat, d)).unwrap();
        }

        let jan = repo.get_for_month(user, MonthKey::new(2025, 1).unwrap()).unwrap();
        assert_eq!(jan.len(), 2);
        assert_eq!(jan[0].date, date(1, 31));
    }

    #[test]
    fn test_category_index_follows_edits() {
        let (_temp, repo) = create_test_repo();
        let user = UserId::new();
        let food = CategoryId::new();
        let rent = CategoryId::new();

        let mut txn = Transaction::expense(user, Money::from_units(20), food, date(1, 5));
        repo.upsert(txn.clone()).unwrap();
        assert!(repo.references_category(user, food).unwrap());

        txn.category_id = rent;
        repo.upsert(txn.clone()).unwrap();
        assert!(!repo.references_category(user, food).unwrap());
        assert_eq!(repo.get_by_category(user, rent).unwrap().len(), 1);

        repo.delete(user, txn.id).unwrap();
        assert!(!repo.references_category(user, rent).unwrap());
    }

    #[test]
    fn test_delete_many_skips_unknown() {
        let (_temp, repo) = create_test_repo();
        let user = UserId::new();
        let cat = CategoryId::new();
        let a = Transaction::expense(user, Money::from_units(1), cat, date(1, 1));
        let b = Transaction::expense(user, Money::from_units(2), cat, date(1, 2));
        repo.upsert(a.clone()).unwrap();
        repo.upsert(b.clone()).unwrap();

        let removed = repo.delete_many(user, &[a.id, TransactionId::new(), b.id]).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.count(user).unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        let user = UserId::new();
        let cat = CategoryId::new();
        let txn = Transaction::income(user, Money::from_cents(123456), cat, date(3, 1)).with_notes("pay");
        repo.upsert(txn.clone()).unwrap();
        repo.save().unwrap();

        let reopened = TransactionRepository::new(temp.path().join("transactions.json"));
        reopened.load().unwrap();
        assert_eq!(reopened.get(user, txn.id).unwrap(), Some(txn));
        assert!(reopened.references_category(user, cat).unwrap());
    }
}
