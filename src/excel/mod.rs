//! Excel export for orders
//!
//! - Layout: fixed rows, columns and labels of the order sheet
//! - Workbook: items + ledger → .xlsx bytes with live formulas
//! - Photos: data-URI payloads → embedded thumbnails

pub mod cells;
pub mod layout;
mod photo;
mod workbook;

pub use photo::{decode_photo, Photo, PhotoFormat};
pub use workbook::{BuildReport, OrderWorkbook, PhotoStatus, RowReport};

use crate::core::pricing::{self, Ledger};
use crate::error::OrderResult;
use crate::types::LineItem;

/// MIME type of the generated document
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `order_<YYYY-MM-DD>.xlsx`
pub fn export_filename(date: chrono::NaiveDate) -> String {
    format!("order_{}.xlsx", date.format("%Y-%m-%d"))
}

/// A finished export: document bytes plus what went into them
#[derive(Debug, Clone)]
pub struct ExportedOrder {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub ledger: Ledger,
    pub report: BuildReport,
}

/// Price `items` and build their workbook in one step
pub fn export_order(items: &[LineItem], workbook: &OrderWorkbook) -> OrderResult<ExportedOrder> {
    let ledger = pricing::compute(items)?;
    let (bytes, report) = workbook.build_with_report(items, &ledger)?;
    Ok(ExportedOrder {
        bytes,
        filename: export_filename(workbook.order_date()),
        ledger,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(export_filename(date), "order_2025-01-09.xlsx");
    }

    #[test]
    fn test_export_order() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let items = vec![LineItem::new("1", "https://1688.com/x", 2, 100.0)];
        let exported = export_order(&items, &OrderWorkbook::new().with_order_date(date)).unwrap();
        assert_eq!(exported.filename, "order_2025-06-01.xlsx");
        assert_eq!(exported.ledger.total_quantity, 2);
        assert_eq!(exported.report.totals_row, 11);
        assert!(!exported.bytes.is_empty());
    }

    #[test]
    fn test_export_order_empty() {
        let result = export_order(&[], &OrderWorkbook::new());
        assert!(matches!(result, Err(crate::error::OrderError::EmptyInput)));
    }
}
