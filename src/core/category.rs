//! The fixed, closed set of expense categories.
//!
//! Expenses and budgets share this set. The declaration order is the order used
//! everywhere categories are listed: budget forms, reports and flat-file columns.

use crate::errors::{Error, Result};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expense category, stored as its label in the database
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Category {
    /// Eating out and takeaway
    #[sea_orm(string_value = "Food")]
    Food,
    /// Clothing, gadgets and other purchases
    #[sea_orm(string_value = "Shopping")]
    Shopping,
    /// Trips, fuel and fares
    #[sea_orm(string_value = "Travel")]
    Travel,
    /// Household groceries
    #[sea_orm(string_value = "Groceries")]
    Groceries,
    /// Rent, utilities and subscriptions
    #[sea_orm(string_value = "Bills")]
    Bills,
    /// Anything else
    #[sea_orm(string_value = "Others")]
    Others,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 6] = [
        Self::Food,
        Self::Shopping,
        Self::Travel,
        Self::Groceries,
        Self::Bills,
        Self::Others,
    ];

    /// Human-readable label, also used as the flat-file column header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Shopping => "Shopping",
            Self::Travel => "Travel",
            Self::Groceries => "Groceries",
            Self::Bills => "Bills",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parses a label case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory {
                name: wanted.to_string(),
            })
    }
}
