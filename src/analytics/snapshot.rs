//! A user's data staged in memory for analysis
//!
//! Callers load the rows once and pass them in explicitly; every method here
//! is a pure computation over that snapshot.

use chrono::NaiveDate;

use crate::models::{Budget, Category, CategoryId, Money, MonthKey, Transaction, TransactionKind};

use super::breakdown::{category_breakdown, six_month_trend, CategorySpending, SpendingTrend};
use super::budget_view::{find_budget_with_spending, BudgetWithSpending};
use super::health::{financial_health, FinancialHealth, HealthInputs};
use super::insights::{smart_insights, Insight, InsightInputs};
use super::monthly::{
    daily_expense_buckets, expense_on, month_total, monthly_totals, weekly_expense_buckets,
    DailyBucket, MonthlyTotals, WeeklyBucket,
};
use super::policy::MAX_INSIGHTS;
use super::velocity::{spending_velocity, SpendingVelocity, VelocityInputs};

#[derive(Debug, Clone)]
pub struct FinancialSnapshot {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    /// Reference date for velocity and insights
    pub today: NaiveDate,
    pub insight_limit: usize,
}

impl FinancialSnapshot {
    pub fn new(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        budgets: Vec<Budget>,
        today: NaiveDate,
    ) -> Self {
        Self {
            transactions,
            categories,
            budgets,
            today,
            insight_limit: MAX_INSIGHTS,
        }
    }

    pub fn with_insight_limit(mut self, limit: usize) -> Self {
        self.insight_limit = limit;
        self
    }

    /// The month containing the reference date
    pub fn current_month(&self) -> MonthKey {
        MonthKey::of(self.today)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Budget for an exact month key
    pub fn budget_for(&self, month: MonthKey) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.month == month)
    }

    pub fn expense_for(&self, month: MonthKey) -> Money {
        month_total(&self.transactions, month, TransactionKind::Expense)
    }

    pub fn monthly_totals(&self, month: MonthKey) -> MonthlyTotals {
        monthly_totals(&self.transactions, month)
    }

    pub fn daily_buckets(&self, month: MonthKey) -> Vec<DailyBucket> {
        daily_expense_buckets(&self.transactions, month)
    }

    pub fn weekly_buckets(&self, month: MonthKey) -> Vec<WeeklyBucket> {
        weekly_expense_buckets(&self.transactions, month)
    }

    pub fn budget_with_spending(&self, month: MonthKey) -> Option<BudgetWithSpending> {
        find_budget_with_spending(&self.budgets, month, &self.transactions)
    }

    pub fn financial_health(&self, month: MonthKey) -> FinancialHealth {
        let totals = self.monthly_totals(month);
        financial_health(HealthInputs {
            income: totals.income,
            expense: totals.expense,
            budget_total: self.budget_for(month).map(|b| b.total_amount),
            previous_expense: Some(self.expense_for(month.prev())),
        })
    }

    /// Velocity for the month containing the reference date
    pub fn velocity(&self) -> SpendingVelocity {
        let month = self.current_month();
        spending_velocity(VelocityInputs {
            today: self.today,
            month_expense: self.expense_for(month),
            budget_total: self.budget_for(month).map(|b| b.total_amount),
            today_spending: expense_on(&self.transactions, self.today),
        })
    }

    pub fn category_breakdown(&self, month: MonthKey) -> Vec<CategorySpending> {
        category_breakdown(&self.transactions, &self.categories, month)
    }

    pub fn spending_trend(&self, month: MonthKey) -> SpendingTrend {
        six_month_trend(&self.transactions, month)
    }

    /// Insights for the month containing the reference date
    pub fn insights(&self) -> Vec<Insight> {
        let month = self.current_month();
        let breakdown = self.category_breakdown(month);
        let velocity = self.velocity();

        smart_insights(InsightInputs {
            month_expense: self.expense_for(month),
            previous_expense: self.expense_for(month.prev()),
            budget_total: self.budget_for(month).map(|b| b.total_amount),
            projected_total: velocity.projected_total,
            top_category: breakdown.first(),
            limit: self.insight_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::health::HealthStatus;
    use crate::analytics::insights::InsightKind;
    use crate::models::UserId;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn reference_snapshot() -> FinancialSnapshot {
        let user = UserId::new();
        let food = Category::new(user, "Food");
        let salary = Category::new(user, "Salary");
        let march = MonthKey::new(2025, 3).unwrap();

        let txns = vec![
            Transaction::income(user, Money::from_units(5000), salary.id, date(3, 1)),
            Transaction::expense(user, Money::from_units(3000), food.id, date(3, 10)),
            Transaction::expense(user, Money::from_units(2000), food.id, date(2, 10)),
        ];
        let budgets = vec![Budget::new(user, march, Money::from_units(3500))];

        FinancialSnapshot::new(txns, vec![food, salary], budgets, date(3, 15))
    }

    #[test]
    fn test_health_from_snapshot() {
        let snapshot = reference_snapshot();
        let health = snapshot.financial_health(snapshot.current_month());
        assert_eq!(health.overall, 62);
        assert_eq!(health.status, HealthStatus::Good);
    }

    #[test]
    fn test_velocity_uses_reference_date() {
        let snapshot = reference_snapshot();
        let velocity = snapshot.velocity();
        assert_eq!(velocity.days_elapsed, 15);
        assert_eq!(velocity.days_remaining, 16);
        assert!(velocity.projected_total > 3500.0);
    }

    #[test]
    fn test_insights_from_snapshot() {
        let snapshot = reference_snapshot();
        let insights = snapshot.insights();
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[1].kind, InsightKind::Warning);
        assert_eq!(insights[2].kind, InsightKind::Opportunity);

        let capped = reference_snapshot().with_insight_limit(1);
        assert_eq!(capped.insights().len(), 1);
    }

    #[test]
    fn test_missing_budget_month() {
        let snapshot = reference_snapshot();
        let april = MonthKey::new(2025, 4).unwrap();
        assert!(snapshot.budget_with_spending(april).is_none());
        assert!(snapshot.budget_with_spending(snapshot.current_month()).is_some());
        assert!(snapshot.category_breakdown(april).is_empty());
    }
}
