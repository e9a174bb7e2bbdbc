//! Recurring transaction templates
//!
//! A template describes a transaction that repeats on a schedule. Nothing
//! turns templates into transactions automatically; they are reminders the
//! user acts on.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, RecurringId, UserId};
use super::money::Money;
use super::transaction::TransactionKind;

/// How often a template repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" => Some(Self::Daily),
            "weekly" | "w" => Some(Self::Weekly),
            "monthly" | "m" => Some(Self::Monthly),
            "yearly" | "annual" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The occurrence after `date`. Monthly and yearly steps clamp to the
    /// end of shorter months (Jan 31 -> Feb 28).
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date + Duration::days(1),
            Self::Weekly => date + Duration::weeks(1),
            Self::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
            Self::Yearly => date.checked_add_months(Months::new(12)).unwrap_or(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringStatus {
    #[default]
    Active,
    Paused,
}

impl fmt::Display for RecurringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// A recurring transaction template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: RecurringId,
    pub user_id: UserId,
    pub name: String,
    pub amount: Money,
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    pub category_id: CategoryId,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    #[serde(default)]
    pub status: RecurringStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        kind: TransactionKind,
        amount: Money,
        category_id: CategoryId,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecurringId::new(),
            user_id,
            name: name.into(),
            amount,
            kind,
            category_id,
            frequency,
            next_date,
            status: RecurringStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RecurringStatus::Active
    }

    pub fn pause(&mut self) {
        self.status = RecurringStatus::Paused;
        self.updated_at = Utc::now();
    }

    pub fn resume(&mut self) {
        self.status = RecurringStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Whether an active template comes due in `[today, today + days]`.
    /// Overdue templates count as due.
    pub fn is_due_within(&self, today: NaiveDate, days: i64) -> bool {
        self.is_active() && self.next_date <= today + Duration::days(days)
    }

    /// Occurrences from `next_date` up to and including `until`
    pub fn occurrences_until(&self, until: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut cursor = self.next_date;
        while cursor <= until {
            dates.push(cursor);
            let next = self.frequency.advance(cursor);
            if next <= cursor {
                break;
            }
            cursor = next;
        }
        dates
    }

    /// Day of month the template fires on, for monthly display
    pub fn day_of_month(&self) -> u32 {
        self.next_date.day()
    }

    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecurringValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(RecurringValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for RecurringTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, next {})",
            self.name,
            self.frequency,
            self.amount,
            self.next_date.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    EmptyName,
    NonPositiveAmount(Money),
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Recurring transaction name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Recurring amount must be greater than zero (got {})", amount)
            }
        }
    }
}

impl std::error::Error for RecurringValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent() -> RecurringTransaction {
        RecurringTransaction::new(
            UserId::new(),
            "Rent",
            TransactionKind::Expense,
            Money::from_units(1200),
            CategoryId::new(),
            Frequency::Monthly,
            date(2025, 1, 31),
        )
    }

    #[test]
    fn test_advance_clamps_month_end() {
        assert_eq!(Frequency::Monthly.advance(date(2025, 1, 31)), date(2025, 2, 28));
        assert_eq!(Frequency::Weekly.advance(date(2025, 1, 28)), date(2025, 2, 4));
        assert_eq!(Frequency::Yearly.advance(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut template = rent();
        assert!(template.is_due_within(date(2025, 1, 25), 7));

        template.pause();
        assert_eq!(template.status, RecurringStatus::Paused);
        assert!(!template.is_due_within(date(2025, 1, 25), 7));

        template.resume();
        assert!(template.is_active());
    }

    #[test]
    fn test_due_window() {
        let template = rent();
        assert!(!template.is_due_within(date(2025, 1, 1), 7));
        assert!(template.is_due_within(date(2025, 2, 10), 0));
    }

    #[test]
    fn test_occurrences() {
        let template = rent();
        let dates = template.occurrences_until(date(2025, 4, 1));
        assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 28)]);
    }

    #[test]
    fn test_validation() {
        let mut template = rent();
        assert!(template.validate().is_ok());
        template.amount = Money::zero();
        assert!(matches!(
            template.validate(),
            Err(RecurringValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::parse("Weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::parse("annual"), Some(Frequency::Yearly));
        assert_eq!(Frequency::parse("hourly"), None);
    }
}
