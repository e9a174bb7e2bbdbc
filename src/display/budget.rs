//! Monthly budget list formatting

use tabled::{settings::Style, Table, Tabled};

use super::report::money;
use crate::models::Budget;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Unallocated")]
    unallocated: String,
    #[tabled(rename = "Categories")]
    categories: usize,
}

/// Budgets, most recent month first
pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets yet. Create one with 'finsight budget set <amount>'.\n".to_string();
    }

    let mut sorted: Vec<&Budget> = budgets.iter().collect();
    sorted.sort_by(|a, b| b.month.cmp(&a.month));

    let rows: Vec<BudgetRow> = sorted
        .into_iter()
        .map(|b| BudgetRow {
            month: b.month.to_string(),
            total: money(b.total_amount, symbol),
            allocated: money(b.allocated_total(), symbol),
            unallocated: money(b.unallocated(), symbol),
            categories: b.allocations.len(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::modern()).to_string();
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetAllocation, CategoryId, Money, MonthKey, UserId};

    #[test]
    fn test_newest_month_first() {
        let user = UserId::new();
        let budgets = vec![
            Budget::new(user, MonthKey::new(2025, 1).unwrap(), Money::from_units(1000)),
            Budget::new(user, MonthKey::new(2025, 2).unwrap(), Money::from_units(900))
                .with_allocations(vec![BudgetAllocation::new(CategoryId::new(), Money::from_units(400))]),
        ];

        let text = format_budget_list(&budgets, "$");
        assert!(text.find("2025-02").unwrap() < text.find("2025-01").unwrap());
        assert!(text.contains("$500.00"));
    }
}
