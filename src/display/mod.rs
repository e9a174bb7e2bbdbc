//! Display formatting for terminal output
//!
//! Turns models and analytics results into tables and text cards. Amounts
//! are printed with the currency symbol from the user's settings.

pub mod budget;
pub mod category;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use budget::format_budget_list;
pub use category::{format_category_details, format_category_list};
pub use goal::{format_goal_details, format_goal_list};
pub use recurring::{format_recurring_list, format_upcoming};
pub use report::{
    format_breakdown, format_budget_view, format_health, format_insights, format_summary,
    format_trend, format_velocity,
};
pub use transaction::{format_transaction_details, format_transaction_register};
