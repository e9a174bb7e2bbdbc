//! Financial health score
//!
//! A 0-100 heuristic built from three weighted sub-scores: savings rate,
//! budget adherence and month-over-month spending trend. The breakpoints
//! live in [`super::policy`] and must not be re-tuned casually; users
//! compare scores across months.

use serde::Serialize;
use std::fmt;

use crate::models::Money;

use super::policy::*;

/// Everything the score needs, already aggregated for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthInputs {
    pub income: Money,
    pub expense: Money,
    /// The month's budget total, if a budget exists
    pub budget_total: Option<Money>,
    /// Expense of the previous calendar month, if known
    pub previous_expense: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub fn from_score(score: u32) -> Self {
        if score >= STATUS_EXCELLENT {
            Self::Excellent
        } else if score >= STATUS_GOOD {
            Self::Good
        } else if score >= STATUS_FAIR {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialHealth {
    /// Weighted score, 0..=100
    pub overall: u32,
    pub status: HealthStatus,
    pub savings_score: f64,
    pub adherence_score: f64,
    pub trend_score: f64,
    /// `(income - expense) / income * 100`, 0 without income
    pub savings_rate: f64,
    /// Expense as a percentage of the budget total, when there is one
    pub budget_usage: Option<f64>,
    /// Expense change versus the previous month, when it had any
    pub spending_change: Option<f64>,
    pub recommendations: Vec<String>,
    pub policy_version: u32,
}

pub const SAVINGS_RECOMMENDATION: &str =
    "Aim to save at least 20% of your income. Look for recurring costs you can cut.";
pub const ADHERENCE_RECOMMENDATION: &str =
    "You're spending close to or beyond your budget. Review your category allocations.";
pub const TREND_RECOMMENDATION: &str =
    "Your spending is rising compared with last month. Keep an eye on discretionary purchases.";

pub fn savings_rate(income: Money, expense: Money) -> f64 {
    if income.is_zero() {
        return 0.0;
    }
    (income - expense).to_f64() / income.to_f64() * 100.0
}

pub fn savings_score(rate: f64) -> f64 {
    (rate * SAVINGS_RATE_MULTIPLIER).clamp(0.0, 100.0)
}

pub fn adherence_score(usage: Option<f64>) -> f64 {
    let Some(usage) = usage else {
        return NEUTRAL_SCORE;
    };

    if usage <= ADHERENCE_FULL_MARKS_USAGE {
        100.0
    } else if usage <= ADHERENCE_LIMIT_USAGE {
        100.0 - (usage - ADHERENCE_FULL_MARKS_USAGE) * ADHERENCE_APPROACH_PENALTY
    } else {
        (ADHERENCE_AT_LIMIT - (usage - ADHERENCE_LIMIT_USAGE) * ADHERENCE_OVERAGE_PENALTY).max(0.0)
    }
}

pub fn trend_score(change: Option<f64>) -> f64 {
    let Some(change) = change else {
        return NEUTRAL_SCORE;
    };

    if change <= TREND_STRONG_DECREASE {
        100.0
    } else if change <= 0.0 {
        100.0 - change.abs() * TREND_DECREASE_PENALTY
    } else if change <= TREND_MILD_INCREASE {
        TREND_MILD_INCREASE_BASE - change * TREND_MILD_INCREASE_PENALTY
    } else {
        (TREND_SHARP_INCREASE_BASE - (change - TREND_MILD_INCREASE) * TREND_SHARP_INCREASE_PENALTY)
            .max(0.0)
    }
}

/// Percentage change from `previous` to `current`; `None` when there is no
/// usable previous value
pub fn percent_change(current: Money, previous: Option<Money>) -> Option<f64> {
    previous
        .filter(|p| !p.is_zero())
        .map(|p| (current - p).to_f64() / p.to_f64() * 100.0)
}

pub fn financial_health(inputs: HealthInputs) -> FinancialHealth {
    let rate = savings_rate(inputs.income, inputs.expense);
    let budget_usage = inputs
        .budget_total
        .filter(|total| !total.is_zero())
        .map(|total| inputs.expense.to_f64() / total.to_f64() * 100.0);
    let spending_change = percent_change(inputs.expense, inputs.previous_expense);

    let savings = savings_score(rate);
    let adherence = adherence_score(budget_usage);
    let trend = trend_score(spending_change);

    let weighted = savings * SAVINGS_WEIGHT + adherence * ADHERENCE_WEIGHT + trend * TREND_WEIGHT;
    let overall = weighted.round().clamp(0.0, 100.0) as u32;

    let mut recommendations = Vec::new();
    if savings < RECOMMEND_SAVINGS_BELOW {
        recommendations.push(SAVINGS_RECOMMENDATION.to_string());
    }
    if adherence < RECOMMEND_ADHERENCE_BELOW {
        recommendations.push(ADHERENCE_RECOMMENDATION.to_string());
    }
    if trend < RECOMMEND_TREND_BELOW {
        recommendations.push(TREND_RECOMMENDATION.to_string());
    }

    FinancialHealth {
        overall,
        status: HealthStatus::from_score(overall),
        savings_score: savings,
        adherence_score: adherence,
        trend_score: trend,
        savings_rate: rate,
        budget_usage,
        spending_change,
        recommendations,
        policy_version: POLICY_VERSION,
    }
}
