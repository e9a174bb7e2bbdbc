//! Spending velocity and month-end projection

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::models::{Money, MonthKey};

use super::policy::{VELOCITY_DANGER_ABOVE, VELOCITY_DISPLAY_MAX, VELOCITY_WARNING_ABOVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityInputs {
    /// Reference date; its month is the month being projected
    pub today: NaiveDate,
    /// Expense so far this month
    pub month_expense: Money,
    pub budget_total: Option<Money>,
    /// Expense already recorded on `today`
    pub today_spending: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityStatus {
    Good,
    Warning,
    Danger,
}

impl VelocityStatus {
    pub fn classify(ratio: f64) -> Self {
        if ratio > VELOCITY_DANGER_ABOVE {
            Self::Danger
        } else if ratio > VELOCITY_WARNING_ABOVE {
            Self::Warning
        } else {
            Self::Good
        }
    }
}

impl fmt::Display for VelocityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingVelocity {
    pub month: MonthKey,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub days_in_month: u32,
    /// Average expense per elapsed day, in currency units
    pub daily_average: f64,
    pub projected_total: f64,
    /// Budget total spread evenly over the month; 0 without a budget
    pub ideal_daily_rate: f64,
    /// Unclamped actual/ideal rate in percent; drives `status`
    pub velocity_ratio: f64,
    /// `velocity_ratio` clamped to the gauge range
    pub display_ratio: f64,
    pub status: VelocityStatus,
    /// What can still be spent today; `None` without a budget
    pub daily_allowance: Option<f64>,
}

impl SpendingVelocity {
    /// Whether the projection runs past the budget total
    pub fn exceeds(&self, budget_total: Money) -> bool {
        self.projected_total > budget_total.to_f64()
    }
}

pub fn spending_velocity(inputs: VelocityInputs) -> SpendingVelocity {
    let month = MonthKey::of(inputs.today);
    let days_in_month = month.days_in_month();
    let days_elapsed = inputs.today.day().max(1);
    let days_remaining = days_in_month.saturating_sub(days_elapsed);

    let expense = inputs.month_expense.to_f64();
    let daily_average = expense / f64::from(days_elapsed);
    let projected_total = expense + daily_average * f64::from(days_remaining);

    let budget = inputs.budget_total.map(|m| m.to_f64()).unwrap_or(0.0);
    let ideal_daily_rate = budget / f64::from(days_in_month);
    let velocity_ratio = if ideal_daily_rate == 0.0 {
        0.0
    } else {
        daily_average / ideal_daily_rate * 100.0
    };

    let daily_allowance = inputs.budget_total.map(|total| {
        let remaining = (total - inputs.month_expense).to_f64();
        let last = month.last_day().day();
        let days_inclusive = (last + 1).saturating_sub(inputs.today.day()).max(1);
        remaining / f64::from(days_inclusive) - inputs.today_spending.to_f64()
    });

    SpendingVelocity {
        month,
        days_elapsed,
        days_remaining,
        days_in_month,
        daily_average,
        projected_total,
        ideal_daily_rate,
        velocity_ratio,
        display_ratio: velocity_ratio.clamp(0.0, VELOCITY_DISPLAY_MAX),
        status: VelocityStatus::classify(velocity_ratio),
        daily_allowance,
    }
}
