//! Export module for finsight
//!
//! - Spreadsheet: one month of transactions as an Excel workbook or CSV
//! - JSON / YAML: a user's complete data, for backups and other tools

pub mod json;
pub mod spreadsheet;
pub mod yaml;

pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use spreadsheet::{export_month, export_month_as, export_month_xlsx, SheetFormat, SPREADSHEET_HEADER};
pub use yaml::export_full_yaml;
