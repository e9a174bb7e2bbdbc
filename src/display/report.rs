//! Report display formatting
//!
//! Renders analytics results (summary, budget view, health score, velocity,
//! breakdown, trend and insights) as plain terminal text.

use tabled::{settings::Style, Table, Tabled};

use crate::analytics::{
    BudgetWithSpending, CategorySpending, FinancialHealth, Insight, InsightKind, MonthlyTotals,
    SpendingTrend, SpendingVelocity, WeeklyBucket,
};
use crate::models::{Category, CategoryId, Money};

const WIDTH: usize = 56;

/// Format a money amount with the configured currency symbol
pub fn money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Format a float amount in currency units
pub fn format_amount(value: f64, symbol: &str) -> String {
    if value < 0.0 {
        format!("-{}{:.2}", symbol, value.abs())
    } else {
        format!("{}{:.2}", symbol, value)
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct.abs() < 0.1 && pct != 0.0 {
        format!("{:.2}%", pct)
    } else if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Signed percentage change ("+12%", "-3.5%")
pub fn format_change(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{}", format_percentage(pct))
    } else {
        format_percentage(pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn title(output: &mut String, text: &str) {
    output.push_str(text);
    output.push('\n');
    output.push_str(&separator(WIDTH));
    output.push('\n');
}

fn category_name(categories: &[Category], id: CategoryId) -> String {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| crate::analytics::breakdown::UNCATEGORIZED.to_string())
}

/// Monthly summary card with weekly spending
pub fn format_summary(totals: &MonthlyTotals, weeks: &[WeeklyBucket], symbol: &str) -> String {
    let mut output = String::new();
    title(&mut output, &format!("Summary for {}", totals.month.label()));

    output.push_str(&format!("{:<14}{:>16}\n", "Income:", money(totals.income, symbol)));
    output.push_str(&format!("{:<14}{:>16}\n", "Expenses:", money(totals.expense, symbol)));
    output.push_str(&format!("{:<14}{:>16}\n", "Net:", money(totals.net, symbol)));
    output.push_str(&format!("{:<14}{:>16}\n", "Transactions:", totals.transaction_count));

    if !weeks.is_empty() {
        output.push_str("\nSpending by week\n");
        let max = weeks.iter().map(|w| w.total.to_f64()).fold(0.0, f64::max);
        for week in weeks {
            output.push_str(&format!(
                "  Week {} ({}-{})  {} {:>12}\n",
                week.week,
                week.start.format("%d"),
                week.end.format("%d"),
                format_bar(week.total.to_f64(), max, 20),
                money(week.total, symbol)
            ));
        }
    }

    output
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Budget with per-allocation spending
pub fn format_budget_view(view: &BudgetWithSpending, categories: &[Category], symbol: &str) -> String {
    let mut output = String::new();
    title(&mut output, &format!("Budget for {}", view.month().label()));

    output.push_str(&format!("Total:       {}\n", money(view.budget.total_amount, symbol)));
    output.push_str(&format!("Spent:       {}\n", money(view.total_spent, symbol)));
    output.push_str(&format!("Remaining:   {}\n", money(view.total_remaining, symbol)));
    let unallocated = view.budget.unallocated();
    if !unallocated.is_zero() {
        output.push_str(&format!("Unallocated: {}\n", money(unallocated, symbol)));
    }
    if view.month_expense != view.total_spent {
        output.push_str(&format!(
            "Outside allocations: {}\n",
            money(view.month_expense - view.total_spent, symbol)
        ));
    }

    if view.allocations.is_empty() {
        output.push_str("\nNo category allocations.\n");
        return output;
    }

    let rows: Vec<AllocationRow> = view
        .allocations
        .iter()
        .map(|a| AllocationRow {
            category: category_name(categories, a.category_id),
            budgeted: money(a.amount, symbol),
            spent: money(a.spent, symbol),
            remaining: money(a.remaining, symbol),
            used: if a.is_over_budget {
                format!("{}% OVER", a.percentage_used)
            } else {
                format!("{}%", a.percentage_used)
            },
        })
        .collect();

    output.push('\n');
    output.push_str(&Table::new(rows).with(Style::modern()).to_string());
    output.push('\n');

    let over = view.over_budget_count();
    if over > 0 {
        output.push_str(&format!("\n{} categor{} over budget\n", over, if over == 1 { "y" } else { "ies" }));
    }

    output
}

/// Financial health score with its components
pub fn format_health(health: &FinancialHealth) -> String {
    let mut output = String::new();
    title(&mut output, "Financial health");

    output.push_str(&format!(
        "Score: {}/100 ({})\n{}\n\n",
        health.overall,
        health.status,
        format_bar(f64::from(health.overall), 100.0, 40)
    ));

    output.push_str(&format!(
        "{:<20}{:>6.0}   savings rate {}\n",
        "Savings",
        health.savings_score,
        format_percentage(health.savings_rate)
    ));

    let usage = health
        .budget_usage
        .map(|u| format!("{} of budget used", format_percentage(u)))
        .unwrap_or_else(|| "no budget".to_string());
    output.push_str(&format!("{:<20}{:>6.0}   {}\n", "Budget adherence", health.adherence_score, usage));

    let change = health
        .spending_change
        .map(|c| format!("{} vs last month", format_change(c)))
        .unwrap_or_else(|| "no prior month".to_string());
    output.push_str(&format!("{:<20}{:>6.0}   {}\n", "Spending trend", health.trend_score, change));

    if !health.recommendations.is_empty() {
        output.push_str("\nRecommendations\n");
        for rec in &health.recommendations {
            output.push_str(&format!("  • {}\n", rec));
        }
    }

    output
}

/// Spending pace and month-end projection
pub fn format_velocity(velocity: &SpendingVelocity, budget: Option<Money>, symbol: &str) -> String {
    let mut output = String::new();
    title(&mut output, &format!("Spending velocity for {}", velocity.month.label()));

    output.push_str(&format!(
        "Day {} of {} ({} remaining)\n",
        velocity.days_elapsed, velocity.days_in_month, velocity.days_remaining
    ));
    output.push_str(&format!("Daily average:   {}\n", format_amount(velocity.daily_average, symbol)));
    output.push_str(&format!("Projected total: {}\n", format_amount(velocity.projected_total, symbol)));

    match budget {
        Some(total) => {
            output.push_str(&format!("Budget:          {}\n", money(total, symbol)));
            output.push_str(&format!("Ideal daily:     {}\n", format_amount(velocity.ideal_daily_rate, symbol)));
            output.push_str(&format!(
                "Pace:            {} {} ({})\n",
                format_bar(velocity.display_ratio, 200.0, 20),
                format_percentage(velocity.velocity_ratio),
                velocity.status
            ));
            if let Some(allowance) = velocity.daily_allowance {
                output.push_str(&format!("Left for today:  {}\n", format_amount(allowance, symbol)));
            }
        }
        None => output.push_str("\nNo budget for this month; set one to see your pace.\n"),
    }

    output
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Txns")]
    count: usize,
    #[tabled(rename = "vs last month")]
    change: String,
}

/// Category breakdown table
pub fn format_breakdown(rows: &[CategorySpending], symbol: &str) -> String {
    if rows.is_empty() {
        return "No expenses this month.\n".to_string();
    }

    let table_rows: Vec<BreakdownRow> = rows
        .iter()
        .map(|r| BreakdownRow {
            category: truncate(&r.name, 24),
            spent: money(r.total, symbol),
            share: format!("{} {}", format_bar(r.percentage, 100.0, 10), format_percentage(r.percentage)),
            count: r.count,
            change: if r.previous_total.is_zero() {
                "new".to_string()
            } else {
                format_change(r.change_percent)
            },
        })
        .collect();

    let mut output = Table::new(table_rows).with(Style::modern()).to_string();
    output.push('\n');
    output
}

/// Six-month trend chart
pub fn format_trend(trend: &SpendingTrend, symbol: &str) -> String {
    let mut output = String::new();
    title(&mut output, "Spending trend");

    let max = trend.months.iter().map(|m| m.total.to_f64()).fold(0.0, f64::max);
    for entry in &trend.months {
        let marker = if trend.highest.map(|h| h.month) == Some(entry.month) { " ▲" } else { "" };
        output.push_str(&format!(
            "{:<9} {} {:>12}{}\n",
            entry.month.label(),
            format_bar(entry.total.to_f64(), max, 24),
            money(entry.total, symbol),
            marker
        ));
    }

    output.push_str(&format!("\nAverage: {}\n", format_amount(trend.average, symbol)));
    if let Some(highest) = trend.highest {
        output.push_str(&format!(
            "Highest: {} ({})\n",
            highest.month.label(),
            money(highest.total, symbol)
        ));
    }

    output
}

fn insight_icon(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Warning => "!",
        InsightKind::Opportunity => "$",
        InsightKind::Achievement => "*",
        InsightKind::Tip => "i",
    }
}

pub fn format_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "Nothing to flag this month.\n".to_string();
    }

    let mut output = String::new();
    for insight in insights {
        output.push_str(&format!(
            "[{}] {} ({})\n    {}\n",
            insight_icon(insight.kind),
            insight.title,
            insight.kind,
            insight.message
        ));
    }
    output
}
