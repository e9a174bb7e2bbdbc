//! Category display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "#")]
    order: i32,
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Default")]
    default: &'static str,
}

/// Format categories as a table, in display order
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'finsight init' to create the default categories.\n".to_string();
    }

    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

    let rows: Vec<CategoryRow> = sorted
        .into_iter()
        .map(|c| CategoryRow {
            order: c.order,
            icon: c.icon.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            id: c.id.to_string(),
            default: if c.is_default { "yes" } else { "" },
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

/// Format a single category's details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {} {}\n", category.icon, category.name));
    output.push_str(&format!("  ID:      {}\n", category.id));
    output.push_str(&format!("  Color:   {}\n", category.color));
    output.push_str(&format!("  Order:   {}\n", category.order));
    if category.is_default {
        output.push_str("  Default: yes\n");
    }

    output
}
