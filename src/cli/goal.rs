//! Savings goal CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, today};
use crate::config::settings::Settings;
use crate::display::goal::{format_goal_details, format_goal_list};
use crate::error::{FinsightError, FinsightResult};
use crate::services::{GoalService, GoalUpdate};
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount (e.g., "5000")
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },

    /// List goals with progress
    List,

    /// Show one goal
    Show {
        /// Goal name or ID
        goal: String,
    },

    /// Add money to a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        amount: String,
    },

    /// Take money out of a goal
    Withdraw {
        /// Goal name or ID
        goal: String,
        amount: String,
    },

    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
    },

    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(storage: &Storage, settings: &Settings, cmd: GoalCommands) -> FinsightResult<()> {
    let service = GoalService::new(storage, settings.require_user()?);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
        } => {
            let deadline = deadline.as_deref().map(parse_date).transpose()?;
            let goal = service.create(&name, parse_amount(&target)?, deadline)?;
            println!("Created goal: {}", goal.name);
            println!("  ID:     {}", goal.id);
            println!("  Target: {}", goal.target_amount.format_with_symbol(symbol));
        }

        GoalCommands::List => {
            print!("{}", format_goal_list(&service.list()?, today(), symbol));
        }

        GoalCommands::Show { goal } => {
            let goal = service
                .find(&goal)?
                .ok_or_else(|| FinsightError::goal_not_found(&goal))?;
            print!("{}", format_goal_details(&goal, today(), symbol));
        }

        GoalCommands::Contribute { goal, amount } => {
            let goal = service.contribute(&goal, parse_amount(&amount)?)?;
            println!(
                "{}: {} of {} saved",
                goal.name,
                goal.current_amount.format_with_symbol(symbol),
                goal.target_amount.format_with_symbol(symbol)
            );
            if goal.is_complete() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Withdraw { goal, amount } => {
            let requested = parse_amount(&amount)?;
            let (goal, withdrawn) = service.withdraw(&goal, requested)?;
            if withdrawn < requested {
                println!(
                    "Only {} was available; withdrew all of it",
                    withdrawn.format_with_symbol(symbol)
                );
            }
            println!(
                "{}: {} of {} saved",
                goal.name,
                goal.current_amount.format_with_symbol(symbol),
                goal.target_amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            deadline,
            clear_deadline,
        } => {
            let changes = GoalUpdate {
                name,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                deadline: deadline.as_deref().map(parse_date).transpose()?,
                clear_deadline,
            };
            let updated = service.update(&goal, changes)?;
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Delete { goal } => {
            let deleted = service.delete(&goal)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
