//! Storage layer for finsight
//!
//! One JSON file per table under `<base>/data/`, atomic writes, per-user row
//! filtering and change events. Two processes writing the same file race at
//! file granularity: the last save wins.

pub mod budgets;
pub mod categories;
pub mod events;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod recurring;
pub mod table;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use events::{ChangeEvent, ChangeSubscriber, EventBus, LiveCache, Row};
pub use goals::GoalRepository;
pub use init::{initialize_storage, seed_default_categories};
pub use recurring::RecurringRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{summarize_changes, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinsightPaths;
use crate::error::FinsightResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FinsightPaths,
    audit: AuditLogger,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub goals: GoalRepository,
    pub recurring: RecurringRepository,
}

impl Storage {
    /// Create a storage instance, creating directories as needed. Tables
    /// start empty until [`Storage::load_all`] is called.
    pub fn new(paths: FinsightPaths) -> FinsightResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            goals: GoalRepository::new(paths.goals_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            paths,
        })
    }

    /// Create a storage instance and load every table
    pub fn open(paths: FinsightPaths) -> FinsightResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &FinsightPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> FinsightResult<()> {
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        self.recurring.load()?;
        debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    pub fn save_all(&self) -> FinsightResult<()> {
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        self.recurring.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinsightResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Audit an update; the change summary is computed from the two rows
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> FinsightResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => summarize_changes(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinsightResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, UserId};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path().to_path_buf());
        let _storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("exports").exists());
    }

    #[test]
    fn test_save_all_then_open() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path().to_path_buf());
        let user = UserId::new();

        let storage = Storage::new(paths.clone()).unwrap();
        storage.categories.upsert(Category::new(user, "Rent")).unwrap();
        storage.save_all().unwrap();
        assert!(paths.categories_file().exists());
        assert!(paths.goals_file().exists());

        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.categories.count(user).unwrap(), 1);
    }

    #[test]
    fn test_update_audit_carries_diff() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(FinsightPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let before = Category::new(UserId::new(), "Food");
        let mut after = before.clone();
        after.name = "Groceries".into();

        storage
            .log_update(EntityType::Category, before.id.to_string(), None, &before, &after)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("name: \"Food\" -> \"Groceries\"")
        );
    }
}
