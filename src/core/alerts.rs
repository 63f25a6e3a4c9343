//! Budget and spending-trend alerts.
//!
//! Both checks are pure functions over expense records: they read nothing but their
//! arguments and return the alerts to show, in a stable order. Callers pick which
//! records to pass in (a single period for budget checks, the whole history for
//! month-over-month comparisons).

use crate::core::{Category, budget::BudgetMap, insights::format_amount};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Month-over-month growth above this fraction of the previous total raises an alert (0.2).
pub const SPIKE_THRESHOLD: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// The logical fields of an expense that alerts and insights read.
pub trait SpendRecord {
    /// Calendar date the money was spent
    fn date(&self) -> NaiveDate;
    /// Amount spent, never negative
    fn amount(&self) -> Decimal;
    /// Category of the expense
    fn category(&self) -> Category;
    /// `YYYY-MM` period derived from the date
    fn period(&self) -> &str;
}

impl<T: SpendRecord + ?Sized> SpendRecord for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }

    fn amount(&self) -> Decimal {
        (**self).amount()
    }

    fn category(&self) -> Category {
        (**self).category()
    }

    fn period(&self) -> &str {
        (**self).period()
    }
}

/// An advisory message about spending. Rendering it with `Display` gives the text
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Total spent in a category went over its budget
    Overspent {
        /// Category over budget
        category: Category,
        /// Total spent in the period
        spent: Decimal,
        /// Budget for the period
        budget: Decimal,
    },
    /// A category's total grew by more than [`SPIKE_THRESHOLD`] over the previous period
    SpendingSpike {
        /// Category label
        category: String,
        /// Period in which the increase happened
        period: String,
        /// Total of the previous observed period
        previous: Decimal,
        /// Total of this period
        current: Decimal,
    },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overspent {
                category,
                spent,
                budget,
            } => write!(
                f,
                "⚠️ Overspent in {category}: {} (Budget: {})",
                format_amount(*spent),
                format_amount(*budget)
            ),
            Self::SpendingSpike {
                category, period, ..
            } => write!(
                f,
                "🔺 Spending on **{category}** increased by more than 20% in {period}"
            ),
        }
    }
}

/// Reports every budgeted category whose spending strictly exceeds its budget.
///
/// `records` should hold the expenses of a single period. Categories without an
/// entry in `budget` are unconstrained and never reported. Alerts follow the
/// budget's category order.
#[must_use]
pub fn check_budget_exceedance<R: SpendRecord>(records: &[R], budget: &BudgetMap) -> Vec<Alert> {
    let mut spent_by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    for record in records {
        *spent_by_category.entry(record.category()).or_default() += record.amount();
    }

    budget
        .iter()
        .filter_map(|(&category, &limit)| {
            let spent = spent_by_category
                .get(&category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            (spent > limit).then_some(Alert::Overspent {
                category,
                spent,
                budget: limit,
            })
        })
        .collect()
}

/// Reports month-over-month spending spikes for every category in `records`.
///
/// See [`compare_monthly_spending_by`] for the rule.
#[must_use]
pub fn compare_monthly_spending<R: SpendRecord>(records: &[R]) -> Vec<Alert> {
    compare_monthly_spending_by(
        records,
        R::category,
        R::amount,
        |record| record.period().to_string(),
    )
}

/// Reports month-over-month spending spikes using caller-chosen fields.
///
/// Records are summed per (category, period). Within each category the observed
/// periods are walked in ascending key order and a period is reported when its
/// total exceeds the previous observed period's total by more than
/// [`SPIKE_THRESHOLD`] of it. A previous total of zero never triggers, and periods
/// with no records for a category are skipped rather than counted as zero.
///
/// Alerts are ordered by category, then period.
#[must_use]
pub fn compare_monthly_spending_by<R, C, P>(
    records: &[R],
    category_of: impl Fn(&R) -> C,
    amount_of: impl Fn(&R) -> Decimal,
    period_of: impl Fn(&R) -> P,
) -> Vec<Alert>
where
    C: Ord + fmt::Display,
    P: Ord + fmt::Display,
{
    let mut totals: BTreeMap<(C, P), Decimal> = BTreeMap::new();
    for record in records {
        *totals
            .entry((category_of(record), period_of(record)))
            .or_default() += amount_of(record);
    }

    let mut alerts = Vec::new();
    let mut previous: Option<(&C, Decimal)> = None;
    for ((category, period), &current) in &totals {
        if let Some((previous_category, previous_total)) = previous
            && previous_category == category
            && previous_total > Decimal::ZERO
            && current - previous_total > SPIKE_THRESHOLD * previous_total
        {
            alerts.push(Alert::SpendingSpike {
                category: category.to_string(),
                period: period.to_string(),
                previous: previous_total,
                current,
            });
        }
        previous = Some((category, current));
    }
    alerts
}
