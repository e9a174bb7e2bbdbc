//! Transaction service
//!
//! Provides business logic for transaction management: creation with
//! category checks, partial edits, single and batch deletes, and listings.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{
    CategoryId, Money, MonthKey, RecurringId, Transaction, TransactionId, TransactionKind, UserId,
};
use crate::storage::Storage;

use super::resolve_short;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    user_id: UserId,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub recurring_id: Option<RecurringId>,
}

impl CreateTransactionInput {
    pub fn expense(amount: Money, category_id: CategoryId, date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount,
            category_id,
            date,
            notes: None,
            recurring_id: None,
        }
    }

    pub fn income(amount: Money, category_id: CategoryId, date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Income,
            ..Self::expense(amount, category_id, date)
        }
    }
}

/// Fields to change on an existing transaction; `None` leaves a field alone.
/// Empty notes clear them.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.kind.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self { storage, user_id }
    }

    fn ensure_category(&self, category_id: CategoryId) -> FinsightResult<()> {
        self.storage
            .categories
            .get(self.user_id, category_id)?
            .ok_or_else(|| FinsightError::category_not_found(category_id.to_string()))?;
        Ok(())
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> FinsightResult<Transaction> {
        self.ensure_category(input.category_id)?;

        let mut txn = Transaction::new(
            self.user_id,
            input.kind,
            input.amount,
            input.category_id,
            input.date,
        );
        if let Some(notes) = input.notes {
            txn = txn.with_notes(notes);
        }
        txn.recurring_id = input.recurring_id;

        txn.validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &txn,
        )?;

        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction created");
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> FinsightResult<Option<Transaction>> {
        self.storage.transactions.get(self.user_id, id)
    }

    /// Find a transaction by full or short ID
    pub fn find(&self, identifier: &str) -> FinsightResult<Option<Transaction>> {
        if let Ok(id) = identifier.trim().parse::<TransactionId>() {
            return self.get(id);
        }
        resolve_short(
            self.storage.transactions.get_for_user(self.user_id)?,
            identifier,
            "Transaction",
            |id, s| id.matches_short(s),
        )
    }

    fn require(&self, identifier: &str) -> FinsightResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| FinsightError::transaction_not_found(identifier))
    }

    /// All transactions, newest first
    pub fn list(&self) -> FinsightResult<Vec<Transaction>> {
        self.storage.transactions.get_for_user(self.user_id)
    }

    /// Transactions of one calendar month, newest first
    pub fn list_for_month(&self, month: MonthKey) -> FinsightResult<Vec<Transaction>> {
        self.storage.transactions.get_for_month(self.user_id, month)
    }

    /// Apply a partial edit
    pub fn update(&self, identifier: &str, changes: TransactionUpdate) -> FinsightResult<Transaction> {
        let mut txn = self.require(identifier)?;
        let before = txn.clone();

        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id)?;
            txn.category_id = category_id;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(kind) = changes.kind {
            txn.kind = kind;
        }
        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(notes) = changes.notes {
            let notes = notes.trim().to_string();
            txn.notes = if notes.is_empty() { None } else { Some(notes) };
        }

        txn.updated_at = Utc::now();
        txn.validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &before,
            &txn,
        )?;

        info!(id = %txn.id, "transaction updated");
        Ok(txn)
    }

    /// Delete one transaction
    pub fn delete(&self, identifier: &str) -> FinsightResult<Transaction> {
        let txn = self.require(identifier)?;

        self.storage.transactions.delete(self.user_id, txn.id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &txn,
        )?;

        info!(id = %txn.id, "transaction deleted");
        Ok(txn)
    }

    /// Delete several transactions in one save. Every identifier must
    /// resolve before anything is removed. Returns the number deleted.
    pub fn delete_many(&self, identifiers: &[String]) -> FinsightResult<usize> {
        let mut ids = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let id = self.require(identifier)?.id;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let removed = self.storage.transactions.delete_many(self.user_id, &ids)?;
        self.storage.transactions.save()?;

        for txn in &removed {
            self.storage.log_delete(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.to_string()),
                txn,
            )?;
        }

        info!(count = removed.len(), "transactions deleted");
        Ok(removed.len())
    }

    pub fn count(&self) -> FinsightResult<usize> {
        self.storage.transactions.count(self.user_id)
    }
}
