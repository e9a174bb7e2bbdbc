//! Spreadsheet export
//!
//! One sheet per month with the columns `Date,Type,Category,Amount,Notes,Recurring`.
//! The sheet is an Excel workbook (`.xlsx`) by default, or CSV when the
//! output file ends in `.csv`. CSV amounts are exact decimal strings; the
//! workbook stores them as numbers formatted to two decimals.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::analytics::breakdown::UNCATEGORIZED;
use crate::error::FinsightResult;
use crate::models::{Category, CategoryId, Money, MonthKey, Transaction};

pub const SPREADSHEET_HEADER: [&str; 6] = ["Date", "Type", "Category", "Amount", "Notes", "Recurring"];

const AMOUNT_COLUMN: u16 = 3;

/// File type of a month sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    /// `.csv` files get CSV, everything else a workbook
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

struct SheetRow<'a> {
    date: String,
    kind: String,
    category: &'a str,
    amount: Money,
    notes: &'a str,
    recurring: bool,
}

impl SheetRow<'_> {
    fn recurring_label(&self) -> &'static str {
        if self.recurring {
            "Yes"
        } else {
            "No"
        }
    }
}

/// The month's rows, oldest first
fn month_rows<'a>(
    transactions: &'a [Transaction],
    categories: &'a [Category],
    month: MonthKey,
) -> Vec<SheetRow<'a>> {
    let names: HashMap<CategoryId, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut txns: Vec<&Transaction> = transactions.iter().filter(|t| month.contains(t.date)).collect();
    txns.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    txns.into_iter()
        .map(|txn| SheetRow {
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            category: names.get(&txn.category_id).copied().unwrap_or(UNCATEGORIZED),
            amount: txn.amount,
            notes: txn.notes.as_deref().unwrap_or(""),
            recurring: txn.is_recurring(),
        })
        .collect()
}

/// Write the month's transactions in the given format. Returns the number
/// of data rows written.
pub fn export_month_as<W: Write>(
    format: SheetFormat,
    transactions: &[Transaction],
    categories: &[Category],
    month: MonthKey,
    writer: W,
) -> FinsightResult<usize> {
    match format {
        SheetFormat::Csv => export_month(transactions, categories, month, writer),
        SheetFormat::Xlsx => export_month_xlsx(transactions, categories, month, writer),
    }
}

/// Write the month's transactions as CSV, oldest first. Returns the number
/// of data rows written.
pub fn export_month<W: Write>(
    transactions: &[Transaction],
    categories: &[Category],
    month: MonthKey,
    writer: W,
) -> FinsightResult<usize> {
    let rows = month_rows(transactions, categories, month);

    let mut sheet = csv::Writer::from_writer(writer);
    sheet.write_record(SPREADSHEET_HEADER)?;

    for row in &rows {
        let amount = row.amount.to_decimal_string();
        sheet.write_record([
            row.date.as_str(),
            row.kind.as_str(),
            row.category,
            amount.as_str(),
            row.notes,
            row.recurring_label(),
        ])?;
    }

    sheet.flush()?;
    info!(month = %month, rows = rows.len(), "csv sheet exported");
    Ok(rows.len())
}

/// Write the month's transactions as an Excel workbook with one worksheet
/// named after the month.
pub fn export_month_xlsx<W: Write>(
    transactions: &[Transaction],
    categories: &[Category],
    month: MonthKey,
    mut writer: W,
) -> FinsightResult<usize> {
    let rows = month_rows(transactions, categories, month);

    let header = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("0.00");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(month.to_string())?;

    for (col, title) in SPREADSHEET_HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.date.as_str())?;
        sheet.write_string(r, 1, row.kind.as_str())?;
        sheet.write_string(r, 2, row.category)?;
        sheet.write_number_with_format(r, AMOUNT_COLUMN, row.amount.to_f64(), &amount_format)?;
        sheet.write_string(r, 4, row.notes)?;
        sheet.write_string(r, 5, row.recurring_label())?;
    }
    sheet.set_column_width(0, 12.0)?;
    sheet.set_column_width(2, 18.0)?;
    sheet.set_column_width(4, 30.0)?;

    writer.write_all(&workbook.save_to_buffer()?)?;
    writer.flush()?;

    info!(month = %month, rows = rows.len(), "workbook exported");
    Ok(rows.len())
}

/// Default file name for a month's sheet
pub fn default_file_name(month: MonthKey) -> String {
    format!("transactions-{}.{}", month, SheetFormat::Xlsx.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecurringId, UserId};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn sample() -> (Vec<Transaction>, Category) {
        let user = UserId::new();
        let food = Category::new(user, "Food");
        let mut recurring = Transaction::expense(user, Money::from_cents(1999), food.id, date(1, 20));
        recurring.recurring_id = Some(RecurringId::new());

        let txns = vec![
            recurring,
            Transaction::income(user, Money::from_cents(300_001), CategoryId::new(), date(1, 1))
                .with_notes("pay, january"),
            Transaction::expense(user, Money::from_units(5), food.id, date(2, 1)),
        ];
        (txns, food)
    }

    #[test]
    fn test_row_count_matches_month() {
        let (txns, food) = sample();

        let mut out = Vec::new();
        let count = export_month(&txns, &[food], MonthKey::new(2025, 1).unwrap(), &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Type,Category,Amount,Notes,Recurring");
        assert_eq!(lines[1], "2025-01-01,Income,Uncategorized,3000.01,\"pay, january\",No");
        assert_eq!(lines[2], "2025-01-20,Expense,Food,19.99,,Yes");
    }

    #[test]
    fn test_empty_month_writes_header_only() {
        let mut out = Vec::new();
        let count = export_month(&[], &[], MonthKey::new(2025, 3).unwrap(), &mut out).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_xlsx_is_a_zip_workbook() {
        let (txns, food) = sample();

        let mut out = Vec::new();
        let count = export_month_xlsx(&txns, &[food], MonthKey::new(2025, 1).unwrap(), &mut out).unwrap();
        assert_eq!(count, 2);
        assert!(out.starts_with(b"PK"));
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(SheetFormat::from_path(&PathBuf::from("jan.csv")), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_path(&PathBuf::from("JAN.CSV")), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_path(&PathBuf::from("jan.xlsx")), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_path(&PathBuf::from("jan")), SheetFormat::Xlsx);
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name(MonthKey::new(2025, 7).unwrap()),
            "transactions-2025-07.xlsx"
        );
    }
}
