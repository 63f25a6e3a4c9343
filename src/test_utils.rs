//! Shared test utilities for `SmartKharch`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{Category, Period, expense},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date, panicking on impossible dates.
#[allow(clippy::expect_used)]
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Parses a `YYYY-MM` literal, panicking on malformed input.
#[allow(clippy::expect_used)]
pub fn test_period(value: &str) -> Period {
    Period::from_str(value).expect("valid test period")
}

/// Creates a test expense without a note.
///
/// # Arguments
/// * `db` - Database connection
/// * `date` - Date as `YYYY-MM-DD`
/// * `category` - Expense category
/// * `amount` - Amount spent
pub async fn create_test_expense(
    db: &DatabaseConnection,
    date: &str,
    category: Category,
    amount: Decimal,
) -> Result<entities::expense::Model> {
    let date = expense::parse_expense_date(date)?;
    expense::create_expense(db, date, amount, category, None).await
}
