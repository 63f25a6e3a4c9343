//! Spending summaries.
//!
//! This module provides the aggregated views shown next to the alerts: daily totals,
//! per-category shares, top categories and the month-by-month trend. All functions
//! are pure and return structured data that the bot layer formats.

use crate::core::{CURRENCY_SYMBOL, Category, alerts::SpendRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

/// Total spent in one category with its share of the overall total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category
    pub category: Category,
    /// Total spent in the category
    pub total: Decimal,
    /// Share of all spending, 0-100
    pub percent: f64,
}

/// Formats an amount with the currency symbol and two decimal places.
///
/// # Returns
/// Formatted string like "₹1250.50"
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

/// Sums all records.
#[must_use]
pub fn total_spent<R: SpendRecord>(records: &[R]) -> Decimal {
    records.iter().map(|record| record.amount()).sum()
}

/// Totals per calendar day, earliest day first.
#[must_use]
pub fn daily_totals<R: SpendRecord>(records: &[R]) -> Vec<(NaiveDate, Decimal)> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        *totals.entry(record.date()).or_default() += record.amount();
    }
    totals.into_iter().collect()
}

/// Totals per category in category order, with each category's share.
///
/// Only categories with at least one record appear.
#[must_use]
pub fn category_totals<R: SpendRecord>(records: &[R]) -> Vec<CategoryShare> {
    let mut totals: BTreeMap<Category, Decimal> = BTreeMap::new();
    for record in records {
        *totals.entry(record.category()).or_default() += record.amount();
    }

    let overall: Decimal = totals.values().copied().sum();
    totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category,
            total,
            percent: percent_of(total, overall),
        })
        .collect()
}

/// Category totals ordered from largest to smallest (ties in category order).
#[must_use]
pub fn top_categories<R: SpendRecord>(records: &[R]) -> Vec<CategoryShare> {
    let mut shares = category_totals(records);
    // Stable sort keeps category order for equal totals
    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}

/// Totals per period across the whole history, oldest first.
#[must_use]
pub fn monthly_totals<R: SpendRecord>(records: &[R]) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in records {
        *totals.entry(record.period().to_string()).or_default() += record.amount();
    }
    totals.into_iter().collect()
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or_default()
}

/// Generates a text bar for visual representation.
///
/// Creates a bar like: `[████████░░] 80.0%`. The bar is clamped to 0-100 while the
/// label shows the real percentage, so overspending reads e.g. `[██████████] 120.0%`.
///
/// # Arguments
/// * `percent` - Percentage to draw
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.clamp(0.0, 100.0);

    // Cast safety: clamped ∈ [0, 100] and length is small, so the result is in [0, length].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}
