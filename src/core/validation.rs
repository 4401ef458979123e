//! Business rules the order form applies before an export is allowed
//!
//! The export engine itself never re-checks these; it only coerces numbers.

use crate::types::LineItem;
use serde::Serialize;
use std::fmt;

/// Marketplaces an order may link to
pub const ALLOWED_DOMAINS: [&str; 4] = ["1688.com", "taobao.com", "tmall.com", "world.taobao.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingUrl,
    UnsupportedDomain,
    NonPositivePrice,
    NonPositiveQuantity,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationIssue::MissingUrl => "product link is empty",
            ValidationIssue::UnsupportedDomain => {
                "product link must point to 1688.com, taobao.com or tmall.com"
            }
            ValidationIssue::NonPositivePrice => "price must be greater than zero",
            ValidationIssue::NonPositiveQuantity => "quantity must be greater than zero",
        };
        f.write_str(msg)
    }
}

/// True when `url` is non-blank and mentions an allowed marketplace.
pub fn validate_url(url: &str) -> bool {
    !url.trim().is_empty() && ALLOWED_DOMAINS.iter().any(|domain| url.contains(domain))
}

/// Every rule `item` breaks, in a stable order.
pub fn validate_item(item: &LineItem) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if item.url.trim().is_empty() {
        issues.push(ValidationIssue::MissingUrl);
    } else if !validate_url(&item.url) {
        issues.push(ValidationIssue::UnsupportedDomain);
    }
    if item.price.is_nan() || item.price <= 0.0 {
        issues.push(ValidationIssue::NonPositivePrice);
    }
    if item.quantity == 0 {
        issues.push(ValidationIssue::NonPositiveQuantity);
    }

    issues
}

pub fn is_item_valid(item: &LineItem) -> bool {
    validate_item(item).is_empty()
}

/// An order can be exported once at least one item is complete.
pub fn is_order_valid(items: &[LineItem]) -> bool {
    items.iter().any(is_item_valid)
}
