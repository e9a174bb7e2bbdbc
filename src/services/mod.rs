//! Service layer for finsight
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging and cross-entity checks. Each service
//! is built for one acting user and never touches another user's rows.

pub mod budget;
pub mod category;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use budget::BudgetService;
pub use category::{CategoryService, CategoryUpdate};
pub use goal::{GoalService, GoalUpdate};
pub use recurring::{CreateRecurringInput, RecurringService};
pub use report::ReportService;
pub use transaction::{CreateTransactionInput, TransactionService, TransactionUpdate};

use crate::error::{FinsightError, FinsightResult};
use crate::storage::Row;

/// Shortest prefix accepted as an ID
const MIN_SHORT_ID_LEN: usize = 4;

/// Pick the row a user-typed identifier refers to. Accepts a full UUID or
/// the short display form (`txn-1a2b3c4d`, or just `1a2b`).
///
/// Returns `Ok(None)` when nothing matches and a validation error when the
/// short form is ambiguous.
pub(crate) fn resolve_short<T: Row>(
    rows: Vec<T>,
    input: &str,
    entity_type: &str,
    matches: impl Fn(&T::Key, &str) -> bool,
) -> FinsightResult<Option<T>> {
    let input = input.trim();
    if input.len() < MIN_SHORT_ID_LEN {
        return Ok(None);
    }
    let mut found: Vec<T> = rows.into_iter().filter(|r| matches(&r.key(), input)).collect();

    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        n => Err(FinsightError::Validation(format!(
            "'{}' matches {} {}s; use more characters",
            input,
            n,
            entity_type.to_lowercase()
        ))),
    }
}
