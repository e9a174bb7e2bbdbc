//! Monthly budget model
//!
//! A budget is a static plan: one total limit per calendar month plus
//! per-category sub-allocations. Spending against it is always derived from
//! transactions, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::month::MonthKey;

/// A per-category sub-limit within a monthly budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// The category this allocation is for
    pub category_id: CategoryId,

    /// Planned spending for the category this month
    pub amount: Money,
}

impl BudgetAllocation {
    pub fn new(category_id: CategoryId, amount: Money) -> Self {
        Self {
            category_id,
            amount,
        }
    }
}

/// A monthly budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Owning user
    pub user_id: UserId,

    /// The calendar month this budget covers
    pub month: MonthKey,

    /// Total spending limit for the month
    pub total_amount: Money,

    /// Per-category sub-allocations
    #[serde(default)]
    pub allocations: Vec<BudgetAllocation>,

    /// When this budget was created
    pub created_at: DateTime<Utc>,

    /// When this budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget without allocations
    pub fn new(user_id: UserId, month: MonthKey, total_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            month,
            total_amount,
            allocations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add allocations (builder style)
    pub fn with_allocations(mut self, allocations: Vec<BudgetAllocation>) -> Self {
        self.allocations = allocations;
        self
    }

    /// Get the allocation for a category
    pub fn allocation_for(&self, category_id: CategoryId) -> Option<&BudgetAllocation> {
        self.allocations.iter().find(|a| a.category_id == category_id)
    }

    /// Set (insert or replace) the allocation for a category
    pub fn set_allocation(&mut self, category_id: CategoryId, amount: Money) {
        match self
            .allocations
            .iter_mut()
            .find(|a| a.category_id == category_id)
        {
            Some(existing) => existing.amount = amount,
            None => self
                .allocations
                .push(BudgetAllocation::new(category_id, amount)),
        }
        self.updated_at = Utc::now();
    }

    /// Remove the allocation for a category; returns whether one existed
    pub fn remove_allocation(&mut self, category_id: CategoryId) -> bool {
        let before = self.allocations.len();
        self.allocations.retain(|a| a.category_id != category_id);
        let removed = self.allocations.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Set the total amount
    pub fn set_total(&mut self, total: Money) {
        self.total_amount = total;
        self.updated_at = Utc::now();
    }

    /// Sum of all per-category allocations
    pub fn allocated_total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// Total minus allocations (negative when over-allocated)
    pub fn unallocated(&self) -> Money {
        self.total_amount - self.allocated_total()
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.total_amount.is_negative() {
            return Err(BudgetValidationError::NegativeTotal);
        }

        let mut seen = HashSet::new();
        for allocation in &self.allocations {
            if allocation.amount.is_negative() {
                return Err(BudgetValidationError::NegativeAllocation(allocation.category_id));
            }
            if !seen.insert(allocation.category_id) {
                return Err(BudgetValidationError::DuplicateAllocation(allocation.category_id));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} budget: {} ({} allocations)",
            self.month,
            self.total_amount,
            self.allocations.len()
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeTotal,
    NegativeAllocation(CategoryId),
    DuplicateAllocation(CategoryId),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeTotal => write!(f, "Budget total cannot be negative"),
            Self::NegativeAllocation(id) => {
                write!(f, "Allocation for category {} cannot be negative", id)
            }
            Self::DuplicateAllocation(id) => {
                write!(f, "Category {} is allocated more than once", id)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> MonthKey {
        MonthKey::new(2025, 1).unwrap()
    }

    #[test]
    fn test_new_budget() {
        let user = UserId::new();
        let budget = Budget::new(user, jan(), Money::from_units(3500));
        assert_eq!(budget.month, jan());
        assert_eq!(budget.total_amount.cents(), 350000);
        assert!(budget.allocations.is_empty());
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_set_and_remove_allocation() {
        let mut budget = Budget::new(UserId::new(), jan(), Money::from_units(1000));
        let food = CategoryId::new();

        budget.set_allocation(food, Money::from_units(300));
        budget.set_allocation(food, Money::from_units(400));
        assert_eq!(budget.allocations.len(), 1);
        assert_eq!(budget.allocation_for(food).unwrap().amount, Money::from_units(400));
        assert_eq!(budget.unallocated(), Money::from_units(600));

        assert!(budget.remove_allocation(food));
        assert!(!budget.remove_allocation(food));
        assert!(budget.allocation_for(food).is_none());
    }

    #[test]
    fn test_validation() {
        let food = CategoryId::new();
        let mut budget = Budget::new(UserId::new(), jan(), Money::from_cents(-1));
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeTotal));

        budget.total_amount = Money::from_units(100);
        budget.allocations = vec![
            BudgetAllocation::new(food, Money::from_units(10)),
            BudgetAllocation::new(food, Money::from_units(20)),
        ];
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::DuplicateAllocation(food))
        );

        budget.allocations = vec![BudgetAllocation::new(food, Money::from_cents(-5))];
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NegativeAllocation(food))
        );
    }

    #[test]
    fn test_over_allocation_is_valid() {
        let budget = Budget::new(UserId::new(), jan(), Money::from_units(100)).with_allocations(vec![
            BudgetAllocation::new(CategoryId::new(), Money::from_units(80)),
            BudgetAllocation::new(CategoryId::new(), Money::from_units(80)),
        ]);
        assert!(budget.validate().is_ok());
        assert_eq!(budget.unallocated(), Money::from_units(-60));
    }

    #[test]
    fn test_serialization() {
        let budget = Budget::new(UserId::new(), jan(), Money::from_units(500))
            .with_allocations(vec![BudgetAllocation::new(CategoryId::new(), Money::from_units(120))]);

        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["month"], "2025-01");
        assert_eq!(json["total_amount"], 50000);

        let back: Budget = serde_json::from_value(json).unwrap();
        assert_eq!(back, budget);
    }
}
