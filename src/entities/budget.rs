//! Budget entity - Per-category spending limits for one period.
//!
//! There is at most one row per period (the period is the primary key) with one
//! column per category. Saving a budget replaces the whole row.

use crate::core::{Category, budget::BudgetMap};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// `YYYY-MM` period this budget applies to
    #[sea_orm(primary_key, auto_increment = false)]
    pub period: String,
    /// Limit for `Food`
    pub food: Decimal,
    /// Limit for `Shopping`
    pub shopping: Decimal,
    /// Limit for `Travel`
    pub travel: Decimal,
    /// Limit for `Groceries`
    pub groceries: Decimal,
    /// Limit for `Bills`
    pub bills: Decimal,
    /// Limit for `Others`
    pub others: Decimal,
    /// When the budget was last saved
    pub updated_at: DateTimeUtc,
}

/// Budgets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The limit stored for a category.
    #[must_use]
    pub const fn amount_for(&self, category: Category) -> Decimal {
        match category {
            Category::Food => self.food,
            Category::Shopping => self.shopping,
            Category::Travel => self.travel,
            Category::Groceries => self.groceries,
            Category::Bills => self.bills,
            Category::Others => self.others,
        }
    }

    /// All limits keyed by category.
    #[must_use]
    pub fn to_budget_map(&self) -> BudgetMap {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.amount_for(category)))
            .collect()
    }
}
