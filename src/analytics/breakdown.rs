//! Category breakdown and six-month spending trend

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Category, CategoryId, Money, MonthKey, Transaction, TransactionKind};

use super::health::percent_change;
use super::monthly::{in_month, month_total};
use super::policy::TREND_MONTHS;

/// Display name for expenses whose category no longer exists
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One category's share of a month's expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Money,
    pub count: usize,
    /// Share of the month's expenses, 0..=100
    pub percentage: f64,
    pub previous_total: Money,
    /// Change versus the previous month; 0 when the category had no spend then
    pub change_percent: f64,
}

/// Group a month's expenses by category, largest first.
///
/// Equal totals keep the order in which their categories first appear in
/// date order.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    month: MonthKey,
) -> Vec<CategorySpending> {
    let mut expenses: Vec<&Transaction> = in_month(transactions, month)
        .filter(|t| t.is_expense())
        .collect();
    expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    let mut order: Vec<CategoryId> = Vec::new();
    let mut groups: HashMap<CategoryId, (Money, usize)> = HashMap::new();
    for txn in &expenses {
        let entry = groups.entry(txn.category_id).or_insert_with(|| {
            order.push(txn.category_id);
            (Money::zero(), 0)
        });
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let month_total: Money = expenses.iter().map(|t| t.amount).sum();
    let previous = month.prev();
    let by_id: HashMap<CategoryId, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let mut rows: Vec<CategorySpending> = order
        .into_iter()
        .map(|category_id| {
            let (total, count) = groups.get(&category_id).copied().unwrap_or_default();
            let previous_total: Money = in_month(transactions, previous)
                .filter(|t| t.is_expense() && t.category_id == category_id)
                .map(|t| t.amount)
                .sum();

            let (name, icon, color) = match by_id.get(&category_id) {
                Some(c) => (c.name.clone(), c.icon.clone(), c.color.clone()),
                None => (UNCATEGORIZED.to_string(), String::new(), "#94a3b8".to_string()),
            };

            CategorySpending {
                category_id,
                name,
                icon,
                color,
                total,
                count,
                percentage: share(total, month_total),
                previous_total,
                change_percent: percent_change(total, Some(previous_total)).unwrap_or(0.0),
            }
        })
        .collect();

    // stable: ties stay in first-seen order
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// `part / whole * 100`, 0 when `whole` is zero
pub fn share(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.to_f64() / whole.to_f64() * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSpending {
    pub month: MonthKey,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingTrend {
    /// Oldest first, ending at the reference month
    pub months: Vec<MonthSpending>,
    /// Mean over all months, including empty ones
    pub average: f64,
    /// Earliest month with the largest total; `None` when nothing was spent
    pub highest: Option<MonthSpending>,
}

/// Expense totals for the trailing months ending at `month`
pub fn six_month_trend(transactions: &[Transaction], month: MonthKey) -> SpendingTrend {
    let months: Vec<MonthSpending> = month
        .trailing(TREND_MONTHS)
        .into_iter()
        .map(|m| MonthSpending {
            month: m,
            total: month_total(transactions, m, TransactionKind::Expense),
        })
        .collect();

    let sum: Money = months.iter().map(|m| m.total).sum();
    let average = sum.to_f64() / months.len().max(1) as f64;

    let mut highest: Option<MonthSpending> = None;
    for entry in &months {
        if entry.total.is_positive() && highest.map_or(true, |h| entry.total > h.total) {
            highest = Some(*entry);
        }
    }

    SpendingTrend {
        months,
        average,
        highest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    #[test]
    fn test_breakdown_groups_and_sorts() {
        let user = UserId::new();
        let food = Category::new(user, "Food");
        let rent = Category::new(user, "Rent");
        let cats = vec![food.clone(), rent.clone()];

        let txns = vec![
            Transaction::expense(user, Money::from_units(100), food.id, date(2025, 3, 2)),
            Transaction::expense(user, Money::from_units(50), food.id, date(2025, 3, 9)),
            Transaction::expense(user, Money::from_units(850), rent.id, date(2025, 3, 1)),
            Transaction::income(user, Money::from_units(4000), rent.id, date(2025, 3, 1)),
            Transaction::expense(user, Money::from_units(100), food.id, date(2025, 2, 12)),
        ];

        let rows = category_breakdown(&txns, &cats, month(2025, 3));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Rent");
        assert_eq!(rows[0].total, Money::from_units(850));
        assert_eq!(rows[0].change_percent, 0.0);
        assert_eq!(rows[1].name, "Food");
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[1].previous_total, Money::from_units(100));
        assert_eq!(rows[1].change_percent, 50.0);
        assert!((rows[1].percentage - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_totals_keep_first_seen_category() {
        let user = UserId::new();
        let a = CategoryId::new();
        let b = CategoryId::new();
        let txns = vec![
            Transaction::expense(user, Money::from_units(40), b, date(2025, 5, 20)),
            Transaction::expense(user, Money::from_units(40), a, date(2025, 5, 3)),
        ];

        let rows = category_breakdown(&txns, &[], month(2025, 5));
        assert_eq!(rows[0].category_id, a);
        assert_eq!(rows[1].category_id, b);
        assert_eq!(rows[0].name, UNCATEGORIZED);
    }

    #[test]
    fn test_empty_month_breakdown() {
        assert!(category_breakdown(&[], &[], month(2025, 1)).is_empty());
        assert_eq!(share(Money::from_units(5), Money::zero()), 0.0);
    }

    #[test]
    fn test_six_month_trend_spans_year_boundary() {
        let user = UserId::new();
        let cat = CategoryId::new();
        let txns = vec![
            Transaction::expense(user, Money::from_units(300), cat, date(2024, 10, 5)),
            Transaction::expense(user, Money::from_units(300), cat, date(2025, 1, 5)),
            Transaction::expense(user, Money::from_units(600), cat, date(2025, 2, 5)),
            Transaction::expense(user, Money::from_units(999), cat, date(2024, 8, 31)),
        ];

        let trend = six_month_trend(&txns, month(2025, 2));
        let keys: Vec<String> = trend.months.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(keys, ["2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02"]);
        assert_eq!(trend.average, 200.0);
        assert_eq!(trend.highest.unwrap().month, month(2025, 2));
    }

    #[test]
    fn test_highest_tie_takes_earliest_month() {
        let user = UserId::new();
        let cat = CategoryId::new();
        let txns = vec![
            Transaction::expense(user, Money::from_units(70), cat, date(2025, 4, 1)),
            Transaction::expense(user, Money::from_units(70), cat, date(2025, 2, 1)),
        ];
        let trend = six_month_trend(&txns, month(2025, 5));
        assert_eq!(trend.highest.unwrap().month, month(2025, 2));
    }

    #[test]
    fn test_empty_trend() {
        let trend = six_month_trend(&[], month(2025, 5));
        assert_eq!(trend.months.len(), 6);
        assert_eq!(trend.average, 0.0);
        assert!(trend.highest.is_none());
    }
}
