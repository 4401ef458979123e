//! Core order logic: pricing, validation, draft state

pub mod draft;
pub mod pricing;
pub mod validation;

pub use draft::{ItemField, OrderDraft};
pub use pricing::{compute, Ledger, LineTotals, Rates, COMMISSION_RATE, EXCHANGE_RATE};
pub use validation::{is_item_valid, is_order_valid, validate_url, ValidationIssue};
