//! Budget-with-spending view
//!
//! Joins a month's allocations against that month's expenses. Spent,
//! remaining and usage are always derived here and never stored.

use serde::Serialize;

use crate::models::{Budget, CategoryId, Money, MonthKey, Transaction};

use super::monthly::in_month;

/// One allocation with what was actually spent against it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSpending {
    pub category_id: CategoryId,
    /// Planned amount
    pub amount: Money,
    pub spent: Money,
    /// `amount - spent`; negative when over
    pub remaining: Money,
    /// `round(spent / amount * 100)`, or 0 when nothing was allocated
    pub percentage_used: u64,
    pub is_over_budget: bool,
}

/// A budget joined with the month's expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWithSpending {
    pub budget: Budget,
    pub allocations: Vec<AllocationSpending>,
    /// Sum of the per-allocation spent amounts
    pub total_spent: Money,
    /// `budget.total_amount - total_spent`
    pub total_remaining: Money,
    /// Every expense in the month, including unallocated categories
    pub month_expense: Money,
}

impl BudgetWithSpending {
    pub fn month(&self) -> MonthKey {
        self.budget.month
    }

    pub fn over_budget_count(&self) -> usize {
        self.allocations.iter().filter(|a| a.is_over_budget).count()
    }
}

/// `round(part / whole * 100)`, 0 when `whole` is zero
pub fn percentage_used(part: Money, whole: Money) -> u64 {
    if whole.is_zero() {
        return 0;
    }
    let pct = (part.to_f64() / whole.to_f64() * 100.0).round();
    if pct <= 0.0 {
        0
    } else {
        pct as u64
    }
}

/// Derive spending for every allocation of `budget` from `transactions`.
/// Only expenses dated in the budget's month count.
pub fn budget_with_spending(budget: &Budget, transactions: &[Transaction]) -> BudgetWithSpending {
    let expenses: Vec<&Transaction> = in_month(transactions, budget.month)
        .filter(|t| t.is_expense())
        .collect();

    let allocations: Vec<AllocationSpending> = budget
        .allocations
        .iter()
        .map(|allocation| {
            let spent: Money = expenses
                .iter()
                .filter(|t| t.category_id == allocation.category_id)
                .map(|t| t.amount)
                .sum();

            AllocationSpending {
                category_id: allocation.category_id,
                amount: allocation.amount,
                spent,
                remaining: allocation.amount - spent,
                percentage_used: percentage_used(spent, allocation.amount),
                is_over_budget: spent > allocation.amount,
            }
        })
        .collect();

    let total_spent: Money = allocations.iter().map(|a| a.spent).sum();

    BudgetWithSpending {
        budget: budget.clone(),
        total_remaining: budget.total_amount - total_spent,
        total_spent,
        month_expense: expenses.iter().map(|t| t.amount).sum(),
        allocations,
    }
}

/// Look up the budget for `month` (exact key) and derive its spending.
/// `None` when the month has no budget; callers must not treat that as a
/// zero budget.
pub fn find_budget_with_spending(
    budgets: &[Budget],
    month: MonthKey,
    transactions: &[Transaction],
) -> Option<BudgetWithSpending> {
    budgets
        .iter()
        .find(|b| b.month == month)
        .map(|budget| budget_with_spending(budget, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetAllocation, UserId};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn jan() -> MonthKey {
        MonthKey::new(2025, 1).unwrap()
    }

    #[test]
    fn test_spending_per_allocation() {
        let user = UserId::new();
        let food = CategoryId::new();
        let fun = CategoryId::new();
        let other = CategoryId::new();

        let budget = Budget::new(user, jan(), Money::from_units(1000)).with_allocations(vec![
            BudgetAllocation::new(food, Money::from_units(300)),
            BudgetAllocation::new(fun, Money::from_units(100)),
        ]);

        let txns = vec![
            Transaction::expense(user, Money::from_units(200), food, date(1, 4)),
            Transaction::expense(user, Money::from_units(150), fun, date(1, 9)),
            Transaction::expense(user, Money::from_units(50), other, date(1, 9)),
            Transaction::income(user, Money::from_units(999), food, date(1, 9)),
            Transaction::expense(user, Money::from_units(999), food, date(2, 1)),
        ];

        let view = budget_with_spending(&budget, &txns);
        let food_row = &view.allocations[0];
        assert_eq!(food_row.spent, Money::from_units(200));
        assert_eq!(food_row.remaining, Money::from_units(100));
        assert_eq!(food_row.percentage_used, 67);
        assert!(!food_row.is_over_budget);

        let fun_row = &view.allocations[1];
        assert_eq!(fun_row.percentage_used, 150);
        assert!(fun_row.is_over_budget);
        assert_eq!(fun_row.remaining, Money::from_units(-50));

        assert_eq!(view.total_spent, Money::from_units(350));
        assert_eq!(view.total_remaining, Money::from_units(650));
        assert_eq!(view.month_expense, Money::from_units(400));
        assert_eq!(view.over_budget_count(), 1);
    }

    #[test]
    fn test_zero_allocation_reports_zero_percent() {
        let user = UserId::new();
        let cat = CategoryId::new();
        let budget = Budget::new(user, jan(), Money::from_units(100))
            .with_allocations(vec![BudgetAllocation::new(cat, Money::zero())]);
        let txns = vec![Transaction::expense(user, Money::from_units(80), cat, date(1, 2))];

        let view = budget_with_spending(&budget, &txns);
        assert_eq!(view.allocations[0].percentage_used, 0);
        assert!(view.allocations[0].is_over_budget);
    }

    #[test]
    fn test_missing_budget_is_none() {
        let user = UserId::new();
        let budgets = vec![Budget::new(user, MonthKey::new(2025, 2).unwrap(), Money::from_units(1))];
        assert!(find_budget_with_spending(&budgets, jan(), &[]).is_none());
        assert!(find_budget_with_spending(&[], jan(), &[]).is_none());
    }

    #[test]
    fn test_no_transactions() {
        let budget = Budget::new(UserId::new(), jan(), Money::from_units(500))
            .with_allocations(vec![BudgetAllocation::new(CategoryId::new(), Money::from_units(200))]);
        let view = find_budget_with_spending(std::slice::from_ref(&budget), jan(), &[]).unwrap();
        assert_eq!(view.total_spent, Money::zero());
        assert_eq!(view.total_remaining, Money::from_units(500));
        assert_eq!(view.allocations[0].percentage_used, 0);
    }
}
