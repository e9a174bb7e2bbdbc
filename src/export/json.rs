//! JSON Export functionality
//!
//! Exports one user's complete data to JSON format with schema versioning.

use crate::error::{FinsightError, FinsightResult};
use crate::models::{Budget, Category, Goal, RecurringTransaction, Transaction, UserId};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full per-user export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user_id: UserId,

    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub recurring_transactions: Vec<RecurringTransaction>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    pub goal_count: usize,
    pub recurring_count: usize,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Gather every table for one user
    pub fn from_storage(storage: &Storage, user_id: UserId) -> FinsightResult<Self> {
        let mut transactions = storage.transactions.get_for_user(user_id)?;
        transactions.reverse();
        let categories = storage.categories.get_for_user(user_id)?;
        let budgets = storage.budgets.get_for_user(user_id)?;
        let goals = storage.goals.get_for_user(user_id)?;
        let recurring_transactions = storage.recurring.get_for_user(user_id)?;

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            category_count: categories.len(),
            budget_count: budgets.len(),
            goal_count: goals.len(),
            recurring_count: recurring_transactions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user_id,
            transactions,
            categories,
            budgets,
            goals,
            recurring_transactions,
            metadata,
        })
    }
}

/// Export a user's data to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    user_id: UserId,
    writer: &mut W,
    pretty: bool,
) -> FinsightResult<()> {
    let export = FullExport::from_storage(storage, user_id)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FinsightError::Export(e.to_string()))?;

    Ok(())
}
