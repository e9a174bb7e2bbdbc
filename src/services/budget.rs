//! Budget service
//!
//! Monthly budgets: one per user per month, a total plus per-category
//! allocations. Spending against a budget is never stored; it is derived
//! on request through the analytics layer.

use tracing::{info, warn};

use crate::analytics::{budget_with_spending, BudgetWithSpending};
use crate::audit::EntityType;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{Budget, CategoryId, Money, MonthKey, UserId};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    user_id: UserId,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self { storage, user_id }
    }

    /// The budget for a month, if one exists
    pub fn get_for_month(&self, month: MonthKey) -> FinsightResult<Option<Budget>> {
        self.storage.budgets.get_for_month(self.user_id, month)
    }

    fn require(&self, month: MonthKey) -> FinsightResult<Budget> {
        self.get_for_month(month)?
            .ok_or_else(|| FinsightError::budget_not_found(month.to_string()))
    }

    /// All budgets, newest month first
    pub fn list(&self) -> FinsightResult<Vec<Budget>> {
        self.storage.budgets.get_for_user(self.user_id)
    }

    fn validate(&self, budget: &Budget) -> FinsightResult<()> {
        budget
            .validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        if budget.unallocated().is_negative() {
            warn!(
                month = %budget.month,
                total = %budget.total_amount,
                allocated = %budget.allocated_total(),
                "allocations exceed the budget total"
            );
        }
        Ok(())
    }

    fn persist(&self, budget: &Budget) -> FinsightResult<()> {
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()
    }

    fn log_change(&self, before: &Budget, after: &Budget) -> FinsightResult<()> {
        self.storage.log_update(
            EntityType::Budget,
            after.id.to_string(),
            Some(after.month.to_string()),
            before,
            after,
        )
    }

    /// Create the budget for a month. Fails with `Duplicate` when the month
    /// already has one.
    pub fn create(&self, month: MonthKey, total: Money) -> FinsightResult<Budget> {
        if self.get_for_month(month)?.is_some() {
            return Err(FinsightError::Duplicate {
                entity_type: "Budget",
                identifier: month.to_string(),
            });
        }

        let budget = Budget::new(self.user_id, month, total);
        self.validate(&budget)?;
        self.persist(&budget)?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.to_string()),
            &budget,
        )?;

        info!(month = %month, total = %total, "budget created");
        Ok(budget)
    }

    pub fn update_total(&self, month: MonthKey, total: Money) -> FinsightResult<Budget> {
        let mut budget = self.require(month)?;
        let before = budget.clone();

        budget.set_total(total);
        self.validate(&budget)?;
        self.persist(&budget)?;
        self.log_change(&before, &budget)?;

        info!(month = %month, total = %total, "budget total updated");
        Ok(budget)
    }

    /// Set (insert or replace) one category's allocation
    pub fn set_allocation(
        &self,
        month: MonthKey,
        category_id: CategoryId,
        amount: Money,
    ) -> FinsightResult<Budget> {
        self.storage
            .categories
            .get(self.user_id, category_id)?
            .ok_or_else(|| FinsightError::category_not_found(category_id.to_string()))?;

        let mut budget = self.require(month)?;
        let before = budget.clone();

        budget.set_allocation(category_id, amount);
        self.validate(&budget)?;
        self.persist(&budget)?;
        self.log_change(&before, &budget)?;

        info!(month = %month, category = %category_id, amount = %amount, "allocation set");
        Ok(budget)
    }

    pub fn remove_allocation(&self, month: MonthKey, category_id: CategoryId) -> FinsightResult<Budget> {
        let mut budget = self.require(month)?;
        let before = budget.clone();

        if !budget.remove_allocation(category_id) {
            return Err(FinsightError::Budget(format!(
                "No allocation for {} in the {} budget",
                category_id, month
            )));
        }

        self.persist(&budget)?;
        self.log_change(&before, &budget)?;

        info!(month = %month, category = %category_id, "allocation removed");
        Ok(budget)
    }

    pub fn delete(&self, month: MonthKey) -> FinsightResult<Budget> {
        let budget = self.require(month)?;

        self.storage.budgets.delete(self.user_id, budget.id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.to_string()),
            &budget,
        )?;

        info!(month = %month, "budget deleted");
        Ok(budget)
    }

    /// The month's budget joined with that month's expenses. `None` when
    /// the month has no budget.
    pub fn get_budget_with_spending(&self, month: MonthKey) -> FinsightResult<Option<BudgetWithSpending>> {
        let Some(budget) = self.get_for_month(month)? else {
            return Ok(None);
        };
        let transactions = self.storage.transactions.get_for_month(self.user_id, month)?;
        Ok(Some(budget_with_spending(&budget, &transactions)))
    }
}
