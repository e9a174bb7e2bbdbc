//! Transaction display formatting
//!
//! Register tables and single-transaction detail views.

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use super::report::{money, truncate};
use crate::analytics::breakdown::UNCATEGORIZED;
use crate::models::{Category, CategoryId, Transaction, TransactionKind};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

fn signed_amount(txn: &Transaction, symbol: &str) -> String {
    match txn.kind {
        TransactionKind::Income => format!("+{}", money(txn.amount, symbol)),
        TransactionKind::Expense => format!("-{}", money(txn.amount, symbol)),
    }
}

/// Format transactions as a register table, in the order given
pub fn format_transaction_register(transactions: &[Transaction], categories: &[Category], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let names: HashMap<CategoryId, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            category: names.get(&txn.category_id).copied().unwrap_or(UNCATEGORIZED).to_string(),
            amount: signed_amount(txn, symbol),
            notes: {
                let notes = truncate(txn.notes.as_deref().unwrap_or(""), 30);
                if txn.is_recurring() {
                    format!("↻ {}", notes).trim_end().to_string()
                } else {
                    notes
                }
            },
        })
        .collect();

    let mut output = Table::new(rows).with(Style::modern()).to_string();
    output.push_str(&format!("\n{} transaction(s)\n", transactions.len()));
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, category_name: Option<&str>, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Full ID:     {}\n", txn.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Amount:      {}\n", money(txn.amount, symbol)));
    output.push_str(&format!("Category:    {}\n", category_name.unwrap_or(UNCATEGORIZED)));

    if let Some(notes) = &txn.notes {
        output.push_str(&format!("Notes:       {}\n", notes));
    }
    if let Some(recurring_id) = txn.recurring_id {
        output.push_str(&format!("Recurring:   {}\n", recurring_id));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecurringId, UserId};
    use chrono::NaiveDate;

    #[test]
    fn test_register_resolves_category_names() {
        let user = UserId::new();
        let food = Category::new(user, "Groceries");
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

        let txns = vec![
            Transaction::expense(user, Money::from_cents(1250), food.id, date).with_notes("weekly shop"),
            Transaction::income(user, Money::from_units(2000), CategoryId::new(), date),
        ];

        let text = format_transaction_register(&txns, &[food], "$");
        assert!(text.contains("Groceries"));
        assert!(text.contains("-$12.50"));
        assert!(text.contains("+$2000.00"));
        assert!(text.contains(UNCATEGORIZED));
        assert!(text.contains("2 transaction(s)"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[], &[], "$"), "No transactions found.\n");
    }

    #[test]
    fn test_details_show_recurring_link() {
        let user = UserId::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut txn = Transaction::expense(user, Money::from_units(15), CategoryId::new(), date);
        txn.recurring_id = Some(RecurringId::new());

        let text = format_transaction_details(&txn, Some("Subscriptions"), "€");
        assert!(text.contains("Category:    Subscriptions"));
        assert!(text.contains("Amount:      €15.00"));
        assert!(text.contains("Recurring:"));
    }
}
