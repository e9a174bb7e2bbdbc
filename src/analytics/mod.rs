//! Spending analytics
//!
//! Pure functions over in-memory transactions, categories and budgets.
//! Nothing here performs I/O or returns an error: empty input and zero
//! denominators fall back to 0 or to a neutral score.

pub mod breakdown;
pub mod budget_view;
pub mod health;
pub mod insights;
pub mod monthly;
pub mod policy;
pub mod snapshot;
pub mod velocity;

pub use breakdown::{category_breakdown, six_month_trend, CategorySpending, MonthSpending, SpendingTrend};
pub use budget_view::{
    budget_with_spending, find_budget_with_spending, AllocationSpending, BudgetWithSpending,
};
pub use health::{financial_health, FinancialHealth, HealthInputs, HealthStatus};
pub use insights::{smart_insights, Insight, InsightInputs, InsightKind};
pub use monthly::{
    daily_expense_buckets, monthly_totals, weekly_expense_buckets, DailyBucket, MonthlyTotals,
    WeeklyBucket,
};
pub use snapshot::FinancialSnapshot;
pub use velocity::{spending_velocity, SpendingVelocity, VelocityInputs, VelocityStatus};
