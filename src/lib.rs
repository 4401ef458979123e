//! Order Forge - order intake export engine
//!
//! Turns a list of purchase line items (marketplace link, photo, quantity,
//! price) into a priced ledger and a formatted `.xlsx` workbook.
//!
//! # Features
//!
//! - Fixed 5% commission and 12.2 exchange rate, applied per line and in total
//! - Summary block, item table and totals row with live Excel formulas
//! - Cached formula results, so the file reads correctly without recalculation
//! - Embedded 80×80 photo thumbnails from data-URI payloads
//! - HTTP export endpoint (`POST /export-excel`) and a CLI
//!
//! # Example
//!
//! ```no_run
//! use order_forge::core::pricing;
//! use order_forge::excel::OrderWorkbook;
//! use order_forge::types::LineItem;
//!
//! let items = vec![LineItem::new("1", "https://detail.1688.com/offer/1.html", 2, 100.0)];
//! let ledger = pricing::compute(&items)?;
//! let bytes = OrderWorkbook::new().build(&items, &ledger)?;
//!
//! std::fs::write("order.xlsx", bytes)?;
//! # Ok::<(), order_forge::error::OrderError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{OrderError, OrderResult, PhotoError};
pub use types::{LineItem, OrderRequest};
