//! Monthly aggregation
//!
//! Totals and day/week buckets for one calendar month. Sums stay in exact
//! cents; an empty month yields zeros and empty bucket lists.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Money, MonthKey, Transaction, TransactionKind};

/// Transactions dated inside `month`
pub fn in_month(transactions: &[Transaction], month: MonthKey) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(move |t| month.contains(t.date))
}

/// Sum of one kind of transaction in a month
pub fn month_total(transactions: &[Transaction], month: MonthKey, kind: TransactionKind) -> Money {
    in_month(transactions, month)
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Income, expense and net for a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub income: Money,
    pub expense: Money,
    /// `income - expense`, the balance shown on the summary card
    pub net: Money,
    pub transaction_count: usize,
}

pub fn monthly_totals(transactions: &[Transaction], month: MonthKey) -> MonthlyTotals {
    let mut income = Money::zero();
    let mut expense = Money::zero();
    let mut transaction_count = 0;

    for txn in in_month(transactions, month) {
        match txn.kind {
            TransactionKind::Income => income += txn.amount,
            TransactionKind::Expense => expense += txn.amount,
        }
        transaction_count += 1;
    }

    MonthlyTotals {
        month,
        income,
        expense,
        net: income - expense,
        transaction_count,
    }
}

/// Expense on a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub total: Money,
    pub count: usize,
}

/// One bucket per day that has expenses, ascending by date
pub fn daily_expense_buckets(transactions: &[Transaction], month: MonthKey) -> Vec<DailyBucket> {
    let mut days: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();
    for txn in in_month(transactions, month).filter(|t| t.is_expense()) {
        let entry = days.entry(txn.date).or_insert((Money::zero(), 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (total, count))| DailyBucket { date, total, count })
        .collect()
}

/// Expense for one week of the month. Week 1 is days 1-7, week 5 is days
/// 29 to the end of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyBucket {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: Money,
}

/// Week-of-month (1..=5) for a date
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// One bucket per week-of-month that has expenses, ascending
pub fn weekly_expense_buckets(transactions: &[Transaction], month: MonthKey) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<u32, Money> = BTreeMap::new();
    for txn in in_month(transactions, month).filter(|t| t.is_expense()) {
        *weeks.entry(week_of_month(txn.date)).or_insert(Money::zero()) += txn.amount;
    }

    let last = month.last_day();
    weeks
        .into_iter()
        .map(|(week, total)| {
            let first_day = (week - 1) * 7 + 1;
            let start = month.first_day().with_day(first_day).unwrap_or(last);
            let end = month
                .first_day()
                .with_day(first_day + 6)
                .filter(|d| *d <= last)
                .unwrap_or(last);
            WeeklyBucket { week, start, end, total }
        })
        .collect()
}

/// Expense dated exactly `date`
pub fn expense_on(transactions: &[Transaction], date: NaiveDate) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.date == date)
        .map(|t| t.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, UserId};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn jan() -> MonthKey {
        MonthKey::new(2025, 1).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        let user = UserId::new();
        let cat = CategoryId::new();
        vec![
            Transaction::income(user, Money::from_units(5000), cat, date(1, 1)),
            Transaction::expense(user, Money::from_cents(1250), cat, date(1, 3)),
            Transaction::expense(user, Money::from_cents(750), cat, date(1, 3)),
            Transaction::expense(user, Money::from_units(100), cat, date(1, 30)),
            Transaction::expense(user, Money::from_units(999), cat, date(2, 1)),
        ]
    }

    #[test]
    fn test_monthly_totals() {
        let totals = monthly_totals(&sample(), jan());
        assert_eq!(totals.income, Money::from_units(5000));
        assert_eq!(totals.expense, Money::from_units(120));
        assert_eq!(totals.net, totals.income - totals.expense);
        assert_eq!(totals.transaction_count, 4);
    }

    #[test]
    fn test_empty_month() {
        let totals = monthly_totals(&[], jan());
        assert_eq!(totals.income, Money::zero());
        assert_eq!(totals.expense, Money::zero());
        assert!(daily_expense_buckets(&[], jan()).is_empty());
        assert!(weekly_expense_buckets(&[], jan()).is_empty());
    }

    #[test]
    fn test_daily_buckets() {
        let buckets = daily_expense_buckets(&sample(), jan());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, date(1, 3));
        assert_eq!(buckets[0].total, Money::from_units(20));
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].date, date(1, 30));
    }

    #[test]
    fn test_weekly_buckets() {
        assert_eq!(week_of_month(date(1, 7)), 1);
        assert_eq!(week_of_month(date(1, 8)), 2);
        assert_eq!(week_of_month(date(1, 31)), 5);

        let buckets = weekly_expense_buckets(&sample(), jan());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].week, 1);
        assert_eq!(buckets[0].total, Money::from_units(20));
        assert_eq!(buckets[1].week, 5);
        assert_eq!(buckets[1].start, date(1, 29));
        assert_eq!(buckets[1].end, date(1, 31));
    }

    #[test]
    fn test_expense_on() {
        assert_eq!(expense_on(&sample(), date(1, 3)), Money::from_units(20));
        assert_eq!(expense_on(&sample(), date(1, 1)), Money::zero());
    }
}
