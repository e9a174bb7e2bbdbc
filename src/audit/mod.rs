//! Append-only audit trail
//!
//! Every create, update and delete that goes through the services is recorded
//! as one JSON line in `audit.log`, with the row before and after the change.
//!
//! ```rust,ignore
//! use finsight::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Transaction,
//!     txn.id.to_string(),
//!     None,
//!     &txn,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
