//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_date_or_today, parse_kind, parse_month_or, today};
use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{FinsightError, FinsightResult};
use crate::services::{CategoryService, CreateTransactionInput, TransactionService, TransactionUpdate};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an expense or income
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Filter by category name or ID
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// New notes; pass "" to clear them
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete one or more transactions
    Delete {
        /// Transaction IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinsightResult<()> {
    let user = settings.require_user()?;
    let service = TransactionService::new(storage, user);
    let category_service = CategoryService::new(storage, user);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            notes,
        } => {
            let category = category_service.require(&category)?;
            let input = CreateTransactionInput {
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                category_id: category.id,
                date: parse_date_or_today(date.as_deref())?,
                notes,
                recurring_id: None,
            };

            let txn = service.create(input)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date.format(&settings.date_format));
            println!("  Type:     {}", txn.kind);
            println!("  Amount:   {}", txn.amount.format_with_symbol(symbol));
            println!("  Category: {}", category.name);
        }

        TransactionCommands::List {
            month,
            category,
            limit,
        } => {
            let mut transactions = match month {
                Some(m) => service.list_for_month(parse_month_or(Some(&m), today())?)?,
                None => service.list()?,
            };

            if let Some(cat) = &category {
                let category = category_service.require(cat)?;
                transactions.retain(|t| t.category_id == category.id);
            }
            transactions.truncate(limit);

            let categories = category_service.list()?;
            print!("{}", format_transaction_register(&transactions, &categories, symbol));
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| FinsightError::transaction_not_found(&id))?;
            let category_name = category_service.get(txn.category_id)?.map(|c| c.name);

            print!(
                "{}",
                format_transaction_details(&txn, category_name.as_deref(), symbol)
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            category,
            date,
            notes,
        } => {
            let changes = TransactionUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category_id: match category {
                    Some(c) => Some(category_service.require(&c)?.id),
                    None => None,
                },
                date: date.as_deref().map(parse_date).transpose()?,
                notes,
            };

            if changes.is_empty() {
                println!("Nothing to change. Pass at least one of --amount, --type, --category, --date or --notes.");
                return Ok(());
            }

            let updated = service.update(&id, changes)?;
            println!("Updated transaction: {}", updated.id);
            println!("  Date:   {}", updated.date.format(&settings.date_format));
            println!("  Type:   {}", updated.kind);
            println!("  Amount: {}", updated.amount.format_with_symbol(symbol));
        }

        TransactionCommands::Delete { ids, force } => {
            if !force {
                println!("About to delete {} transaction(s):", ids.len());
                for id in &ids {
                    let txn = service
                        .find(id)?
                        .ok_or_else(|| FinsightError::transaction_not_found(id))?;
                    println!(
                        "  {}  {}  {}",
                        txn.id,
                        txn.date.format(&settings.date_format),
                        txn.amount.format_with_symbol(symbol)
                    );
                }
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            if let [id] = ids.as_slice() {
                let deleted = service.delete(id)?;
                println!("Deleted transaction: {} ({})", deleted.id, deleted.date);
            } else {
                let count = service.delete_many(&ids)?;
                println!("Deleted {} transactions", count);
            }
        }
    }

    Ok(())
}
