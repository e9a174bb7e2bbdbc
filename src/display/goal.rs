//! Savings goal display formatting

use chrono::NaiveDate;
use tabled::{settings::Style, Table, Tabled};

use super::report::{format_bar, format_percentage, money};
use crate::models::Goal;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

fn deadline_label(goal: &Goal, today: NaiveDate) -> String {
    match (goal.deadline, goal.days_until_deadline(today)) {
        (Some(date), Some(days)) if days < 0 => format!("{} (passed)", date),
        (Some(date), Some(days)) => format!("{} ({}d)", date, days),
        _ => "-".to_string(),
    }
}

pub fn format_goal_list(goals: &[Goal], today: NaiveDate, symbol: &str) -> String {
    if goals.is_empty() {
        return "No savings goals yet.\n".to_string();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            name: if g.is_complete() {
                format!("{} {} ✓", g.icon, g.name)
            } else {
                format!("{} {}", g.icon, g.name)
            },
            saved: money(g.current_amount, symbol),
            target: money(g.target_amount, symbol),
            progress: format!(
                "{} {}",
                format_bar(g.progress_percent(), 100.0, 12),
                format_percentage(g.progress_percent())
            ),
            deadline: deadline_label(g, today),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::modern()).to_string();
    output.push('\n');
    output
}

pub fn format_goal_details(goal: &Goal, today: NaiveDate, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal: {} {}\n", goal.icon, goal.name));
    output.push_str(&format!("  ID:        {}\n", goal.id));
    output.push_str(&format!("  Saved:     {}\n", money(goal.current_amount, symbol)));
    output.push_str(&format!("  Target:    {}\n", money(goal.target_amount, symbol)));
    output.push_str(&format!("  Remaining: {}\n", money(goal.remaining(), symbol)));
    output.push_str(&format!("  Progress:  {}\n", format_percentage(goal.progress_percent())));
    if goal.deadline.is_some() {
        output.push_str(&format!("  Deadline:  {}\n", deadline_label(goal, today)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, UserId};

    #[test]
    fn test_goal_list() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut trip = Goal::new(UserId::new(), "Trip", Money::from_units(1000))
            .with_deadline(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        trip.contribute(Money::from_units(250));

        let text = format_goal_list(&[trip], today, "$");
        assert!(text.contains("$250.00"));
        assert!(text.contains("$1000.00"));
        assert!(text.contains("25%"));
        assert!(text.contains("(30d)"));
    }

    #[test]
    fn test_details_without_deadline() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let goal = Goal::new(UserId::new(), "Fund", Money::from_units(100));
        let text = format_goal_details(&goal, today, "$");
        assert!(text.contains("Remaining: $100.00"));
        assert!(!text.contains("Deadline"));
    }
}
