//! Core business logic - expenses, budgets, alerts and spending summaries.
//!
//! Everything here is independent of the chat interface. Persistence goes through
//! the repository functions in [`expense`] and [`budget`]; [`alerts`] and
//! [`insights`] are pure functions over loaded records.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Budget exceedance and month-over-month spending alerts
pub mod alerts;
/// Per-period category budgets
pub mod budget;
/// The fixed category set
pub mod category;
/// Expense recording and queries
pub mod expense;
/// CSV import and export of the expense and budget tables
pub mod flatfile;
/// Aggregated spending summaries
pub mod insights;
/// Immutable snapshot of all stored data
pub mod ledger;
/// `YYYY-MM` periods
pub mod period;

pub use category::Category;
pub use period::Period;

/// Currency symbol shown in front of every amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Largest amount accepted for one expense or budget limit (1,000,000,000,000).
///
/// Keeps totals over any realistic number of rows far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Rounds an amount to two decimal places, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates and rounds an amount before it is stored.
///
/// Negative zero becomes zero.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for negative amounts and amounts above [`MAX_AMOUNT`].
pub fn checked_money(amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(Error::invalid_amount(amount));
    }
    let rounded = round_money(amount);
    Ok(if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    })
}
