//! Budget repository
//!
//! Manages `budgets.json`. Month lookups are exact key matches; the
//! one-budget-per-month rule is enforced by the budget service, not here.

use std::path::PathBuf;

use crate::error::FinsightResult;
use crate::models::{Budget, BudgetId, MonthKey, UserId};

use super::events::EventBus;
use super::table::JsonTable;

pub struct BudgetRepository {
    table: JsonTable<Budget>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: JsonTable::new("budgets", path),
        }
    }

    pub fn events(&self) -> &EventBus<Budget> {
        self.table.events()
    }

    pub fn load(&self) -> FinsightResult<()> {
        self.table.load().map(|_| ())
    }

    pub fn save(&self) -> FinsightResult<()> {
        self.table.save()
    }

    pub fn get(&self, user_id: UserId, id: BudgetId) -> FinsightResult<Option<Budget>> {
        self.table.get(user_id, id)
    }

    /// The user's budget for a month. If a hand-edited file holds several,
    /// the earliest created wins.
    pub fn get_for_month(&self, user_id: UserId, month: MonthKey) -> FinsightResult<Option<Budget>> {
        Ok(self
            .table
            .select(user_id, |b| b.month == month)?
            .into_iter()
            .min_by_key(|b| b.created_at))
    }

    /// All of a user's budgets, most recent month first
    pub fn get_for_user(&self, user_id: UserId) -> FinsightResult<Vec<Budget>> {
        let mut budgets = self.table.all_for(user_id)?;
        budgets.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(budgets)
    }

    pub fn upsert(&self, budget: Budget) -> FinsightResult<()> {
        self.table.upsert(budget).map(|_| ())
    }

    pub fn delete(&self, user_id: UserId, id: BudgetId) -> FinsightResult<Option<Budget>> {
        self.table.delete(user_id, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetAllocation, CategoryId, Money};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn month(m: u32) -> MonthKey {
        MonthKey::new(2025, m).unwrap()
    }

    #[test]
    fn test_exact_month_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        let user = UserId::new();

        repo.upsert(Budget::new(user, month(1), Money::from_units(3000))).unwrap();
        repo.upsert(Budget::new(user, month(3), Money::from_units(3500))).unwrap();

        assert!(repo.get_for_month(user, month(2)).unwrap().is_none());
        assert_eq!(
            repo.get_for_month(user, month(3)).unwrap().unwrap().total_amount,
            Money::from_units(3500)
        );
        assert!(repo.get_for_month(UserId::new(), month(1)).unwrap().is_none());

        let months: Vec<_> = repo.get_for_user(user).unwrap().iter().map(|b| b.month).collect();
        assert_eq!(months, vec![month(3), month(1)]);
    }

    #[test]
    fn test_round_trip_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetRepository::new(path.clone());
        let user = UserId::new();
        let allocations = vec![
            BudgetAllocation::new(CategoryId::new(), Money::from_cents(50050)),
            BudgetAllocation::new(CategoryId::new(), Money::from_units(900)),
        ];
        let budget = Budget::new(user, month(6), Money::from_units(3500)).with_allocations(allocations.clone());
        repo.upsert(budget).unwrap();
        repo.save().unwrap();

        let reopened = BudgetRepository::new(path);
        reopened.load().unwrap();
        let loaded = reopened.get_for_month(user, month(6)).unwrap().unwrap();

        assert_eq!(loaded.total_amount, Money::from_units(3500));
        let expected: HashSet<_> = allocations.into_iter().collect();
        let actual: HashSet<_> = loaded.allocations.into_iter().collect();
        assert_eq!(actual, expected);
    }
}
