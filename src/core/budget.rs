//! Budget business logic - saving and loading per-period category limits.
//!
//! A budget is always written as a complete row: every category gets a value, and
//! saving again for the same period replaces the previous row.

use crate::{
    core::{Category, Period, checked_money},
    entities::{Budget, budget},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;
use tracing::info;

/// Spending limit per category, in category display order
pub type BudgetMap = BTreeMap<Category, Decimal>;

/// Combines budget form inputs with what is already saved.
///
/// Each category takes the supplied value, else the existing saved value, else zero.
/// The result always covers every category.
#[must_use]
pub fn merge_budget_inputs(existing: Option<&BudgetMap>, inputs: &BudgetMap) -> BudgetMap {
    Category::ALL
        .into_iter()
        .map(|category| {
            let amount = inputs
                .get(&category)
                .or_else(|| existing.and_then(|saved| saved.get(&category)))
                .copied()
                .unwrap_or(Decimal::ZERO);
            (category, amount)
        })
        .collect()
}

/// Saves the budget for a period, replacing any previous budget for it.
///
/// Categories missing from `amounts` are saved as zero. Negative and over-limit
/// amounts are rejected before anything is written.
pub async fn save_budget<C>(db: &C, period: &Period, amounts: &BudgetMap) -> Result<budget::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut limits = BudgetMap::new();
    for category in Category::ALL {
        let amount = amounts.get(&category).copied().unwrap_or(Decimal::ZERO);
        limits.insert(category, checked_money(amount)?);
    }
    let limit = |category: Category| limits.get(&category).copied().unwrap_or(Decimal::ZERO);
    let row = budget::ActiveModel {
        period: Set(period.to_string()),
        food: Set(limit(Category::Food)),
        shopping: Set(limit(Category::Shopping)),
        travel: Set(limit(Category::Travel)),
        groceries: Set(limit(Category::Groceries)),
        bills: Set(limit(Category::Bills)),
        others: Set(limit(Category::Others)),
        updated_at: Set(chrono::Utc::now()),
    };

    // Remove-then-insert keeps the one-row-per-period rule without partial updates
    let txn = db.begin().await?;
    Budget::delete_by_id(period.to_string()).exec(&txn).await?;
    let saved = row.insert(&txn).await?;
    txn.commit().await?;

    info!(period = %period, "Saved budget");
    Ok(saved)
}

/// Retrieves the saved budget for a period, if any.
pub async fn get_budget_for_period<C>(db: &C, period: &Period) -> Result<Option<BudgetMap>>
where
    C: ConnectionTrait,
{
    let row = Budget::find_by_id(period.to_string()).one(db).await?;
    Ok(row.as_ref().map(budget::Model::to_budget_map))
}

/// Retrieves every saved budget, oldest period first.
pub async fn get_all_budgets<C>(db: &C) -> Result<Vec<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .order_by_asc(budget::Column::Period)
        .all(db)
        .await
        .map_err(Into::into)
}
