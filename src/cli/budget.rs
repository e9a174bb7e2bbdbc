//! Budget CLI commands
//!
//! Monthly budgets: totals, per-category allocations and the spending view.

use clap::Subcommand;

use super::{parse_amount, parse_month_or, today};
use crate::config::settings::Settings;
use crate::display::budget::format_budget_list;
use crate::display::report::format_budget_view;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{Budget, CategoryId};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create or change a month's total budget
    Set {
        /// Total amount (e.g., "2000")
        amount: String,
        /// Budget month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Allocate part of the budget to a category
    Allocate {
        /// Category name or ID
        category: String,
        /// Amount (e.g., "300")
        amount: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Remove a category allocation
    Unallocate {
        /// Category name or ID
        category: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show a month's budget with spending per allocation
    Show {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List all budgets
    List,

    /// Delete a month's budget
    Delete {
        #[arg(short, long)]
        month: Option<String>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinsightResult<()> {
    let user = settings.require_user()?;
    let service = BudgetService::new(storage, user);
    let category_service = CategoryService::new(storage, user);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set { amount, month } => {
            let month = parse_month_or(month.as_deref(), today())?;
            let total = parse_amount(&amount)?;

            let budget = if service.get_for_month(month)?.is_some() {
                service.update_total(month, total)?
            } else {
                service.create(month, total)?
            };

            println!(
                "Budget for {}: {}",
                budget.month,
                budget.total_amount.format_with_symbol(symbol)
            );
            if !budget.allocations.is_empty() {
                println!(
                    "  Unallocated: {}",
                    budget.unallocated().format_with_symbol(symbol)
                );
            }
        }

        BudgetCommands::Allocate {
            category,
            amount,
            month,
        } => {
            let month = parse_month_or(month.as_deref(), today())?;
            let category = category_service.require(&category)?;
            let budget = service.set_allocation(month, category.id, parse_amount(&amount)?)?;

            println!(
                "Allocated {} to {} for {}",
                amount_for(&budget, category.id, symbol),
                category.name,
                month
            );
            let unallocated = budget.unallocated();
            if unallocated.is_negative() {
                println!(
                    "  Warning: allocations exceed the total by {}",
                    unallocated.abs().format_with_symbol(symbol)
                );
            } else {
                println!("  Unallocated: {}", unallocated.format_with_symbol(symbol));
            }
        }

        BudgetCommands::Unallocate { category, month } => {
            let month = parse_month_or(month.as_deref(), today())?;
            let category = category_service.require(&category)?;
            service.remove_allocation(month, category.id)?;
            println!("Removed the {} allocation from {}", category.name, month);
        }

        BudgetCommands::Show { month } => {
            let month = parse_month_or(month.as_deref(), today())?;
            let view = service
                .get_budget_with_spending(month)?
                .ok_or_else(|| FinsightError::budget_not_found(month.to_string()))?;
            let categories = category_service.list()?;
            print!("{}", format_budget_view(&view, &categories, symbol));
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&service.list()?, symbol));
        }

        BudgetCommands::Delete { month, force } => {
            let month = parse_month_or(month.as_deref(), today())?;
            if !force {
                let budget = service
                    .get_for_month(month)?
                    .ok_or_else(|| FinsightError::budget_not_found(month.to_string()))?;
                println!(
                    "About to delete the {} budget ({}, {} allocations)",
                    budget.month,
                    budget.total_amount.format_with_symbol(symbol),
                    budget.allocations.len()
                );
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(month)?;
            println!("Deleted budget for {}", deleted.month);
        }
    }

    Ok(())
}

fn amount_for(budget: &Budget, category_id: CategoryId, symbol: &str) -> String {
    budget
        .allocation_for(category_id)
        .map(|a| a.amount.format_with_symbol(symbol))
        .unwrap_or_default()
}
