//! Expense entity - One recorded purchase.
//!
//! Expenses are created and deleted but never edited. The `period` column is the
//! `YYYY-MM` of `date`, written once at creation so that period filters stay simple.

use crate::core::{Category, alerts::SpendRecord};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Day the money was spent
    pub date: Date,
    /// Amount spent, rounded to two decimal places
    pub amount: Decimal,
    /// Category of the expense
    pub category: Category,
    /// Optional free-text note
    pub note: Option<String>,
    /// `YYYY-MM` of `date`
    pub period: String,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Expenses have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl SpendRecord for Model {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category(&self) -> Category {
        self.category
    }

    fn period(&self) -> &str {
        &self.period
    }
}
