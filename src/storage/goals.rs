//! Goal repository
//!
//! Manages `goals.json`.

use std::path::PathBuf;

use crate::error::FinsightResult;
use crate::models::{Goal, GoalId, UserId};

use super::events::EventBus;
use super::table::JsonTable;

pub struct GoalRepository {
    table: JsonTable<Goal>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: JsonTable::new("goals", path),
        }
    }

    pub fn events(&self) -> &EventBus<Goal> {
        self.table.events()
    }

    pub fn load(&self) -> FinsightResult<()> {
        self.table.load().map(|_| ())
    }

    pub fn save(&self) -> FinsightResult<()> {
        self.table.save()
    }

    pub fn get(&self, user_id: UserId, id: GoalId) -> FinsightResult<Option<Goal>> {
        self.table.get(user_id, id)
    }

    /// Goals with a deadline first (soonest first), then the rest by name
    pub fn get_for_user(&self, user_id: UserId) -> FinsightResult<Vec<Goal>> {
        let mut goals = self.table.all_for(user_id)?;
        goals.sort_by(|a, b| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        Ok(goals)
    }

    pub fn upsert(&self, goal: Goal) -> FinsightResult<()> {
        self.table.upsert(goal).map(|_| ())
    }

    pub fn delete(&self, user_id: UserId, id: GoalId) -> FinsightResult<Option<Goal>> {
        self.table.delete(user_id, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_deadline_ordering() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        let user = UserId::new();
        let d = |m| NaiveDate::from_ymd_opt(2026, m, 1).unwrap();

        repo.upsert(Goal::new(user, "Emergency fund", Money::from_units(5000))).unwrap();
        repo.upsert(Goal::new(user, "Laptop", Money::from_units(1500)).with_deadline(d(9))).unwrap();
        repo.upsert(Goal::new(user, "Trip", Money::from_units(2000)).with_deadline(d(3))).unwrap();

        let names: Vec<_> = repo.get_for_user(user).unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Trip", "Laptop", "Emergency fund"]);
    }
}
