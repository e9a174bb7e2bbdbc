//! Scoring policy
//!
//! Every threshold and weight used by the health score, velocity
//! classification and insight rules. Changing any value here changes scores
//! users have already seen, so bump [`POLICY_VERSION`] along with it.

/// Version of this threshold table
pub const POLICY_VERSION: u32 = 1;

/// Sub-score used whenever the data needed for a real score is missing
pub const NEUTRAL_SCORE: f64 = 50.0;

// Financial health weights (sum to 1.0)
pub const SAVINGS_WEIGHT: f64 = 0.4;
pub const ADHERENCE_WEIGHT: f64 = 0.35;
pub const TREND_WEIGHT: f64 = 0.25;

/// Savings rate is doubled, so a 50% savings rate scores 100
pub const SAVINGS_RATE_MULTIPLIER: f64 = 2.0;

// Budget adherence: usage% of the month's budget total
pub const ADHERENCE_FULL_MARKS_USAGE: f64 = 80.0;
pub const ADHERENCE_LIMIT_USAGE: f64 = 100.0;
/// Score at exactly 100% usage
pub const ADHERENCE_AT_LIMIT: f64 = 50.0;
/// Points lost per usage% between full marks and the limit
pub const ADHERENCE_APPROACH_PENALTY: f64 = 2.5;
/// Points lost per usage% over the limit
pub const ADHERENCE_OVERAGE_PENALTY: f64 = 2.0;

// Spending trend: change% of expense versus the previous month
pub const TREND_STRONG_DECREASE: f64 = -10.0;
pub const TREND_DECREASE_PENALTY: f64 = 5.0;
pub const TREND_MILD_INCREASE: f64 = 10.0;
pub const TREND_MILD_INCREASE_BASE: f64 = 50.0;
pub const TREND_MILD_INCREASE_PENALTY: f64 = 2.5;
pub const TREND_SHARP_INCREASE_BASE: f64 = 25.0;
pub const TREND_SHARP_INCREASE_PENALTY: f64 = 1.25;

// Overall status buckets (inclusive lower bounds)
pub const STATUS_EXCELLENT: u32 = 80;
pub const STATUS_GOOD: u32 = 60;
pub const STATUS_FAIR: u32 = 40;

// A recommendation is added when a sub-score falls below its threshold
pub const RECOMMEND_SAVINGS_BELOW: f64 = 40.0;
pub const RECOMMEND_ADHERENCE_BELOW: f64 = 50.0;
pub const RECOMMEND_TREND_BELOW: f64 = 40.0;

// Spending velocity, as actual/ideal daily rate in percent
pub const VELOCITY_DANGER_ABOVE: f64 = 120.0;
pub const VELOCITY_WARNING_ABOVE: f64 = 100.0;
pub const VELOCITY_DISPLAY_MAX: f64 = 200.0;

// Smart insights
/// Top category share of the month's spend that flags a savings opportunity
pub const TOP_CATEGORY_SPEND_SHARE: f64 = 30.0;
/// Top category share of the budget total that triggers an allocation tip
pub const TOP_CATEGORY_BUDGET_SHARE: f64 = 25.0;
/// Fraction of the top category suggested as a saving target
pub const SUGGESTED_CUT: f64 = 0.10;
pub const MOM_INCREASE_WARNING: f64 = 15.0;
pub const MOM_DECREASE_ACHIEVEMENT: f64 = -10.0;
/// Default cap on insights shown at once
pub const MAX_INSIGHTS: usize = 3;

/// Months in the spending trend, including the reference month
pub const TREND_MONTHS: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum = SAVINGS_WEIGHT + ADHERENCE_WEIGHT + TREND_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_adherence_curve_is_continuous_at_limit() {
        let at_limit = 100.0
            - (ADHERENCE_LIMIT_USAGE - ADHERENCE_FULL_MARKS_USAGE) * ADHERENCE_APPROACH_PENALTY;
        assert_eq!(at_limit, ADHERENCE_AT_LIMIT);
    }
}
