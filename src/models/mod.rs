//! Core data models for finsight
//!
//! The five tables of the finance tracker (transactions, categories, budgets,
//! goals, recurring templates) plus the value types they share: typed IDs,
//! exact money amounts and calendar month keys.

pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod month;
pub mod recurring;
pub mod transaction;

pub use budget::{Budget, BudgetAllocation, BudgetValidationError};
pub use category::{Category, CategoryValidationError, DefaultCategory};
pub use goal::{Goal, GoalValidationError};
pub use ids::{BudgetId, CategoryId, GoalId, RecurringId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use month::{MonthKey, MonthParseError};
pub use recurring::{Frequency, RecurringStatus, RecurringTransaction, RecurringValidationError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
