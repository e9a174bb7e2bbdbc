//! Smart insights
//!
//! A fixed list of rules, each producing at most one insight. Results are
//! ordered by kind (warnings first) and capped.

use serde::Serialize;
use std::fmt;

use crate::models::{CategoryId, Money};

use super::breakdown::{share, CategorySpending};
use super::health::percent_change;
use super::policy::{
    MOM_DECREASE_ACHIEVEMENT, MOM_INCREASE_WARNING, SUGGESTED_CUT, TOP_CATEGORY_BUDGET_SHARE,
    TOP_CATEGORY_SPEND_SHARE,
};

/// Insight kinds in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Opportunity,
    Achievement,
    Tip,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Opportunity => write!(f, "opportunity"),
            Self::Achievement => write!(f, "achievement"),
            Self::Tip => write!(f, "tip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// The figure the insight is about (projection, saving, change%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub month_expense: Money,
    pub previous_expense: Money,
    pub budget_total: Option<Money>,
    /// Projected month-end expense, in currency units
    pub projected_total: f64,
    /// Largest category of the month, if any
    pub top_category: Option<&'a CategorySpending>,
    pub limit: usize,
}

fn budget_overage(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let budget = inputs.budget_total.filter(|b| b.is_positive())?;
    if inputs.projected_total <= budget.to_f64() {
        return None;
    }

    let over = inputs.projected_total - budget.to_f64();
    Some(Insight {
        kind: InsightKind::Warning,
        title: "Budget overage projected".to_string(),
        message: format!(
            "At this pace you'll spend ${:.2} this month, ${:.2} over your {} budget.",
            inputs.projected_total, over, budget
        ),
        category_id: None,
        value: Some(inputs.projected_total),
    })
}

fn top_category(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let top = inputs.top_category.filter(|c| c.total.is_positive())?;

    if top.percentage > TOP_CATEGORY_SPEND_SHARE {
        let cut = Money::from_cents((top.total.cents() as f64 * SUGGESTED_CUT).round() as i64);
        return Some(Insight {
            kind: InsightKind::Opportunity,
            title: format!("Savings opportunity in {}", top.name),
            message: format!(
                "{} makes up {:.0}% of your spending. Cutting it by {:.0}% would save {}.",
                top.name,
                top.percentage,
                SUGGESTED_CUT * 100.0,
                cut
            ),
            category_id: Some(top.category_id),
            value: Some(cut.to_f64()),
        });
    }

    let budget = inputs.budget_total.filter(|b| b.is_positive())?;
    let budget_share = share(top.total, budget);
    if budget_share > TOP_CATEGORY_BUDGET_SHARE {
        return Some(Insight {
            kind: InsightKind::Tip,
            title: format!("Review your {} allocation", top.name),
            message: format!(
                "{} alone has used {:.0}% of this month's budget.",
                top.name, budget_share
            ),
            category_id: Some(top.category_id),
            value: Some(budget_share),
        });
    }

    None
}

fn month_over_month(inputs: &InsightInputs<'_>) -> Option<Insight> {
    let change = percent_change(inputs.month_expense, Some(inputs.previous_expense))?;

    if change > MOM_INCREASE_WARNING {
        Some(Insight {
            kind: InsightKind::Warning,
            title: "Spending is up".to_string(),
            message: format!("You've spent {:.0}% more than last month.", change),
            category_id: None,
            value: Some(change),
        })
    } else if change < MOM_DECREASE_ACHIEVEMENT {
        Some(Insight {
            kind: InsightKind::Achievement,
            title: "Spending is down".to_string(),
            message: format!("Nice work: you've spent {:.0}% less than last month.", change.abs()),
            category_id: None,
            value: Some(change),
        })
    } else {
        None
    }
}

/// Evaluate every rule in order, then sort by kind and cap at `limit`
pub fn smart_insights(inputs: InsightInputs<'_>) -> Vec<Insight> {
    let rules: [fn(&InsightInputs<'_>) -> Option<Insight>; 3] =
        [budget_overage, top_category, month_over_month];

    let mut insights: Vec<Insight> = rules.iter().filter_map(|rule| rule(&inputs)).collect();
    insights.sort_by_key(|i| i.kind);
    insights.truncate(inputs.limit);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spending(name: &str, total: i64, percentage: f64) -> CategorySpending {
        CategorySpending {
            category_id: CategoryId::new(),
            name: name.to_string(),
            icon: String::new(),
            color: "#000000".to_string(),
            total: Money::from_units(total),
            count: 1,
            percentage,
            previous_total: Money::zero(),
            change_percent: 0.0,
        }
    }

    fn inputs(top: Option<&CategorySpending>) -> InsightInputs<'_> {
        InsightInputs {
            month_expense: Money::from_units(1000),
            previous_expense: Money::from_units(1000),
            budget_total: Some(Money::from_units(2000)),
            projected_total: 1500.0,
            top_category: top,
            limit: 3,
        }
    }

    #[test]
    fn test_quiet_month_has_no_insights() {
        assert!(smart_insights(inputs(None)).is_empty());
    }

    #[test]
    fn test_projection_over_budget_warns() {
        let mut i = inputs(None);
        i.projected_total = 2500.0;
        let out = smart_insights(i);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, InsightKind::Warning);
        assert_eq!(out[0].value, Some(2500.0));
    }

    #[test]
    fn test_concentrated_category_is_opportunity() {
        let top = spending("Dining", 400, 40.0);
        let out = smart_insights(inputs(Some(&top)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, InsightKind::Opportunity);
        assert_eq!(out[0].category_id, Some(top.category_id));
        assert_eq!(out[0].value, Some(40.0));
    }

    #[test]
    fn test_large_share_of_budget_is_tip() {
        // 600 of 2000 is 30% of budget while only 25% of spend
        let top = spending("Rent", 600, 25.0);
        let out = smart_insights(inputs(Some(&top)));
        assert_eq!(out[0].kind, InsightKind::Tip);

        let mut no_budget = inputs(Some(&top));
        no_budget.budget_total = None;
        assert!(smart_insights(no_budget).is_empty());
    }

    #[test]
    fn test_month_over_month_rules() {
        let mut up = inputs(None);
        up.month_expense = Money::from_units(1200);
        assert_eq!(smart_insights(up)[0].title, "Spending is up");

        let mut down = inputs(None);
        down.month_expense = Money::from_units(800);
        assert_eq!(smart_insights(down)[0].kind, InsightKind::Achievement);

        let mut no_history = inputs(None);
        no_history.previous_expense = Money::zero();
        no_history.month_expense = Money::from_units(5000);
        assert!(smart_insights(no_history).is_empty());
    }

    #[test]
    fn test_sorted_by_priority_and_capped() {
        let top = spending("Rent", 600, 25.0);
        let mut i = inputs(Some(&top));
        i.month_expense = Money::from_units(800);
        i.projected_total = 2100.0;

        let out = smart_insights(i);
        let kinds: Vec<InsightKind> = out.iter().map(|x| x.kind).collect();
        assert_eq!(
            kinds,
            vec![InsightKind::Warning, InsightKind::Achievement, InsightKind::Tip]
        );

        i.limit = 2;
        assert_eq!(smart_insights(i).len(), 2);
        i.limit = 0;
        assert!(smart_insights(i).is_empty());
    }
}
