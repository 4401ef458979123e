//! Pricing calculator: line items → ledger
//!
//! Every derived value the workbook shows is computed here once. The
//! spreadsheet builder writes these numbers as cached formula results, so the
//! arithmetic below mirrors the formulas it emits.

use crate::error::{OrderError, OrderResult};
use crate::types::LineItem;
use serde::Serialize;

/// Commission charged on the source-currency subtotal (5%)
pub const COMMISSION_RATE: f64 = 0.05;

/// Source-currency → target-currency rate (roubles per yuan)
pub const EXCHANGE_RATE: f64 = 12.2;

/// The pair of rates a ledger was computed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    pub commission_rate: f64,
    pub exchange_rate: f64,
}

impl Rates {
    pub const FIXED: Rates = Rates {
        commission_rate: COMMISSION_RATE,
        exchange_rate: EXCHANGE_RATE,
    };
}

impl Default for Rates {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Derived values for one line item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineTotals {
    pub quantity: u32,
    pub price: f64,
    pub line_total: f64,
    pub commission: f64,
    pub total_with_commission: f64,
    pub total_converted: f64,
}

impl LineTotals {
    fn values(&self) -> [(&'static str, f64); 4] {
        [
            ("line total", self.line_total),
            ("commission", self.commission),
            ("total with commission", self.total_with_commission),
            ("converted total", self.total_converted),
        ]
    }

    fn from_item(item: &LineItem, rates: Rates) -> Self {
        let price = non_negative(item.price);
        let line_total = price * f64::from(item.quantity);
        let commission = line_total * rates.commission_rate;
        let total_with_commission = line_total + commission;
        Self {
            quantity: item.quantity,
            price,
            line_total,
            commission,
            total_with_commission,
            total_converted: total_with_commission * rates.exchange_rate,
        }
    }
}

/// Per-item and aggregate totals for one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    pub rates: Rates,
    pub lines: Vec<LineTotals>,
    pub total_quantity: u64,
    pub total_price: f64,
    pub total_commission: f64,
    pub total_with_commission: f64,
    pub total_converted: f64,
}

impl Ledger {
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Every derived value ends up as a cached cell result and must be a
    /// real number.
    pub fn ensure_finite(&self) -> OrderResult<()> {
        for (index, line) in self.lines.iter().enumerate() {
            if let Some((name, _)) = line.values().into_iter().find(|(_, v)| !v.is_finite()) {
                return Err(OrderError::OutOfRange(format!("item {} {name}", index + 1)));
            }
        }

        let totals = [
            ("total price", self.total_price),
            ("total commission", self.total_commission),
            ("total with commission", self.total_with_commission),
            ("total converted", self.total_converted),
        ];
        match totals.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(OrderError::OutOfRange(name.to_string())),
            None => Ok(()),
        }
    }
}

/// Compute the ledger for `items` with the fixed rates.
pub fn compute(items: &[LineItem]) -> OrderResult<Ledger> {
    compute_with_rates(items, Rates::FIXED)
}

/// Compute the ledger for `items` with explicit rates.
///
/// Fails with [`OrderError::EmptyInput`] when there is nothing to price, and
/// with [`OrderError::OutOfRange`] when a product or sum overflows `f64`.
pub fn compute_with_rates(items: &[LineItem], rates: Rates) -> OrderResult<Ledger> {
    if items.is_empty() {
        return Err(OrderError::EmptyInput);
    }

    let lines: Vec<LineTotals> = items
        .iter()
        .map(|item| LineTotals::from_item(item, rates))
        .collect();

    let total_quantity = lines.iter().map(|l| u64::from(l.quantity)).sum();
    let total_price: f64 = lines.iter().map(|l| l.line_total).sum();
    let total_commission = total_price * rates.commission_rate;
    let total_with_commission = total_price + total_commission;

    let ledger = Ledger {
        rates,
        lines,
        total_quantity,
        total_price,
        total_commission,
        total_with_commission,
        total_converted: total_with_commission * rates.exchange_rate,
    };
    ledger.ensure_finite()?;
    Ok(ledger)
}

/// Σ price × quantity, without rejecting empty input (used by the draft form)
pub fn subtotal(items: &[LineItem]) -> f64 {
    items
        .iter()
        .map(|item| non_negative(item.price) * f64::from(item.quantity))
        .sum()
}

fn non_negative(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}
