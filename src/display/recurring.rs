//! Recurring template display formatting

use std::collections::HashMap;

use chrono::NaiveDate;
use tabled::{settings::Style, Table, Tabled};

use super::report::money;
use crate::analytics::breakdown::UNCATEGORIZED;
use crate::models::{Category, CategoryId, RecurringTransaction};

#[derive(Tabled)]
struct RecurringRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Every")]
    frequency: String,
    #[tabled(rename = "Next")]
    next_date: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_recurring_list(templates: &[RecurringTransaction], categories: &[Category], symbol: &str) -> String {
    if templates.is_empty() {
        return "No recurring transactions.\n".to_string();
    }

    let names: HashMap<CategoryId, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let rows: Vec<RecurringRow> = templates
        .iter()
        .map(|t| RecurringRow {
            id: t.id.to_string(),
            name: t.name.clone(),
            kind: t.kind.to_string(),
            amount: money(t.amount, symbol),
            category: names.get(&t.category_id).copied().unwrap_or(UNCATEGORIZED).to_string(),
            frequency: t.frequency.to_string(),
            next_date: t.next_date.format("%Y-%m-%d").to_string(),
            status: t.status.to_string(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::modern()).to_string();
    output.push('\n');
    output
}

/// Upcoming occurrences within the window, soonest first
pub fn format_upcoming(templates: &[RecurringTransaction], today: NaiveDate, until: NaiveDate, symbol: &str) -> String {
    let mut due: Vec<(NaiveDate, &RecurringTransaction)> = templates
        .iter()
        .flat_map(|t| t.occurrences_until(until).into_iter().map(move |d| (d, t)))
        .collect();
    due.sort_by_key(|(date, _)| *date);

    if due.is_empty() {
        return format!("Nothing due before {}.\n", until.format("%Y-%m-%d"));
    }

    let mut output = String::new();
    for (date, template) in due {
        let overdue = if date < today { "  (overdue)" } else { "" };
        output.push_str(&format!(
            "{}  {:<24} {:>12}  {}{}\n",
            date.format("%Y-%m-%d"),
            template.name,
            money(template.amount, symbol),
            template.kind,
            overdue
        ));
    }
    output
}
