//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod export;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{FinsightError, FinsightResult};
use crate::models::{Money, MonthKey, TransactionKind};

/// Today's local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a positive amount such as "12.50" or "$1,200"
pub fn parse_amount(input: &str) -> FinsightResult<Money> {
    let amount = Money::parse(input).map_err(|e| {
        FinsightError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '50' or '12.99'. Error: {}",
            input, e
        ))
    })?;

    if !amount.is_positive() {
        return Err(FinsightError::Validation(format!(
            "Amount must be greater than zero (got {})",
            input
        )));
    }
    Ok(amount)
}

pub fn parse_date(input: &str) -> FinsightResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        FinsightError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Parse an optional date, defaulting to today
pub fn parse_date_or_today(input: Option<&str>) -> FinsightResult<NaiveDate> {
    input.map(parse_date).unwrap_or_else(|| Ok(today()))
}

/// Parse an optional `YYYY-MM` month, defaulting to the month of `fallback`
pub fn parse_month_or(input: Option<&str>, fallback: NaiveDate) -> FinsightResult<MonthKey> {
    match input {
        Some(s) => MonthKey::parse(s).map_err(|e| FinsightError::Validation(e.to_string())),
        None => Ok(MonthKey::of(fallback)),
    }
}

pub fn parse_kind(input: &str) -> FinsightResult<TransactionKind> {
    TransactionKind::parse(input).ok_or_else(|| {
        FinsightError::Validation(format!(
            "Invalid type: '{}'. Use 'expense' or 'income'",
            input
        ))
    })
}
