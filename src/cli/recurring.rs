//! Recurring transaction CLI commands
//!
//! Templates only describe a schedule; nothing here posts transactions.

use chrono::Duration;
use clap::Subcommand;

use super::{parse_amount, parse_date_or_today, parse_kind, today};
use crate::config::settings::Settings;
use crate::display::recurring::{format_recurring_list, format_upcoming};
use crate::error::{FinsightError, FinsightResult};
use crate::models::Frequency;
use crate::services::{CategoryService, CreateRecurringInput, RecurringService};
use crate::storage::Storage;

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Create a recurring template
    Add {
        /// Name, e.g. "Rent"
        name: String,
        /// Amount per occurrence
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// daily, weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// First occurrence (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        next: Option<String>,
    },

    /// List recurring templates
    List,

    /// Stop a template from coming due
    Pause {
        /// Template name or ID
        id: String,
    },

    /// Reactivate a paused template
    Resume {
        /// Template name or ID
        id: String,
    },

    /// Delete a template
    Delete {
        /// Template name or ID
        id: String,
    },

    /// Show what comes due soon
    Upcoming {
        /// Window length in days
        #[arg(short, long, default_value = "30")]
        days: i64,
    },
}

/// Handle a recurring command
pub fn handle_recurring_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RecurringCommands,
) -> FinsightResult<()> {
    let user = settings.require_user()?;
    let service = RecurringService::new(storage, user);
    let category_service = CategoryService::new(storage, user);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        RecurringCommands::Add {
            name,
            amount,
            category,
            frequency,
            kind,
            next,
        } => {
            let category = category_service.require(&category)?;
            let frequency = Frequency::parse(&frequency).ok_or_else(|| {
                FinsightError::Validation(format!(
                    "Invalid frequency: '{}'. Use daily, weekly, monthly, or yearly",
                    frequency
                ))
            })?;

            let template = service.create(CreateRecurringInput {
                name,
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                category_id: category.id,
                frequency,
                next_date: parse_date_or_today(next.as_deref())?,
            })?;

            println!("Created recurring transaction: {}", template.name);
            println!("  ID:       {}", template.id);
            println!("  Every:    {}", template.frequency);
            println!("  Amount:   {}", template.amount.format_with_symbol(symbol));
            println!("  Next:     {}", template.next_date.format(&settings.date_format));
        }

        RecurringCommands::List => {
            let categories = category_service.list()?;
            print!("{}", format_recurring_list(&service.list()?, &categories, symbol));
        }

        RecurringCommands::Pause { id } => {
            let template = service.pause(&id)?;
            println!("Paused: {}", template.name);
        }

        RecurringCommands::Resume { id } => {
            let template = service.resume(&id)?;
            println!("Resumed: {} (next {})", template.name, template.next_date);
        }

        RecurringCommands::Delete { id } => {
            let template = service.delete(&id)?;
            println!("Deleted recurring transaction: {}", template.name);
        }

        RecurringCommands::Upcoming { days } => {
            if days < 0 {
                return Err(FinsightError::Validation("--days cannot be negative".into()));
            }
            let today = today();
            let due = service.upcoming(today, days)?;
            print!("{}", format_upcoming(&due, today, today + Duration::days(days), symbol));
        }
    }

    Ok(())
}
