//! Transaction model
//!
//! A transaction is either an expense or an income. The amount is always
//! stored positive; `kind` decides which side of every aggregation it lands on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, RecurringId, TransactionId, UserId};
use super::money::Money;

/// Maximum length of transaction notes
pub const MAX_NOTES_LEN: usize = 500;

/// Whether money left or entered the user's pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    /// Parse "expense"/"income" (also accepts "e"/"i")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" | "out" => Some(Self::Expense),
            "income" | "i" | "in" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owning user
    pub user_id: UserId,

    /// Amount, always positive
    pub amount: Money,

    /// Expense or income
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Category this transaction is filed under
    pub category_id: CategoryId,

    /// Transaction date
    pub date: NaiveDate,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// The recurring template this transaction was generated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<RecurringId>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        category_id: CategoryId,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            amount,
            kind,
            category_id,
            date,
            notes: None,
            recurring_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an expense
    pub fn expense(user_id: UserId, amount: Money, category_id: CategoryId, date: NaiveDate) -> Self {
        Self::new(user_id, TransactionKind::Expense, amount, category_id, date)
    }

    /// Create an income
    pub fn income(user_id: UserId, amount: Money, category_id: CategoryId, date: NaiveDate) -> Self {
        Self::new(user_id, TransactionKind::Income, amount, category_id, date)
    }

    /// Attach notes (builder style)
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Whether this transaction was spawned from a recurring template
    pub fn is_recurring(&self) -> bool {
        self.recurring_id.is_some()
    }

    /// Mark the transaction as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(TransactionValidationError::NotesTooLong(notes.chars().count()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    NotesTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be greater than zero (got {})", amount)
            }
            Self::NotesTooLong(len) => {
                write!(f, "Notes too long ({} chars, max {})", len, MAX_NOTES_LEN)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_new_expense() {
        let user = UserId::new();
        let category = CategoryId::new();
        let txn = Transaction::expense(user, Money::from_cents(5000), category, jan_15());

        assert!(txn.is_expense());
        assert!(!txn.is_income());
        assert!(!txn.is_recurring());
        assert_eq!(txn.user_id, user);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_amount_must_be_positive() {
        let txn = Transaction::income(UserId::new(), Money::zero(), CategoryId::new(), jan_15());
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(Money::zero()))
        );

        let txn = Transaction::expense(
            UserId::new(),
            Money::from_cents(-100),
            CategoryId::new(),
            jan_15(),
        );
        assert!(txn.validate().is_err());
    }

    #[test]
    fn test_notes() {
        let txn = Transaction::expense(UserId::new(), Money::from_cents(100), CategoryId::new(), jan_15())
            .with_notes("   ");
        assert!(txn.notes.is_none());

        let txn = txn.with_notes("x".repeat(MAX_NOTES_LEN + 1));
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NotesTooLong(_))
        ));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(TransactionKind::parse("Expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("i"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("transfer"), None);
    }

    #[test]
    fn test_serialization_uses_type_field() {
        let txn = Transaction::income(UserId::new(), Money::from_cents(250000), CategoryId::new(), jan_15());
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["amount"], 250000);
        assert!(json.get("notes").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_display() {
        let txn = Transaction::expense(UserId::new(), Money::from_cents(5000), CategoryId::new(), jan_15());
        assert_eq!(format!("{}", txn), "2025-01-15 Expense $50.00");
    }
}
