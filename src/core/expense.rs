//! Expense business logic - recording, listing and deleting expenses.
//!
//! Expenses are validated here before they are stored: amounts must be finite and
//! non-negative, and the period is always derived from the date. Records are never
//! edited after creation; a wrong entry is deleted and recorded again.

use crate::{
    core::{Category, Period, checked_money},
    entities::{Expense, expense},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, info};

/// How far back an expense date may be entered from the chat interface.
pub const MAX_BACKDATE_DAYS: u64 = 365;

/// Converts an amount typed by a user into a two-place decimal.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for NaN, infinite, negative or over-limit values.
pub fn amount_from_input(value: f64) -> Result<Decimal> {
    let invalid = || Error::InvalidAmount {
        amount: value.to_string(),
    };
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    let amount = Decimal::try_from(value).map_err(|_| invalid())?;
    checked_money(amount).map_err(|_| invalid())
}

/// Parses a `YYYY-MM-DD` date typed by a user.
pub fn parse_expense_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Checks that a date is neither in the future nor more than a year before `today`.
pub fn validate_expense_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date > today {
        return Err(Error::InvalidDate {
            value: date.to_string(),
            reason: "date is in the future".to_string(),
        });
    }
    if let Some(earliest) = today.checked_sub_days(Days::new(MAX_BACKDATE_DAYS))
        && date < earliest
    {
        return Err(Error::InvalidDate {
            value: date.to_string(),
            reason: format!("dates before {earliest} cannot be entered"),
        });
    }
    Ok(())
}

/// Records a new expense.
///
/// The amount is rounded to two decimal places, a blank note is stored as `None`,
/// and the period is derived from `date`.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for negative amounts and amounts above
/// [`MAX_AMOUNT`](crate::core::MAX_AMOUNT).
pub async fn create_expense<C>(
    db: &C,
    date: NaiveDate,
    amount: Decimal,
    category: Category,
    note: Option<String>,
) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let amount = checked_money(amount)?;

    let note = note
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let expense = expense::ActiveModel {
        date: Set(date),
        amount: Set(amount),
        category: Set(category),
        note: Set(note),
        period: Set(Period::from_date(date).to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = expense.insert(db).await?;
    info!(id = result.id, %category, amount = %result.amount, %date, "Recorded expense");
    Ok(result)
}

/// Deletes an expense by ID.
///
/// # Errors
/// Returns [`Error::ExpenseNotFound`] when no expense has that ID.
pub async fn delete_expense<C>(db: &C, expense_id: i64) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let expense = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    Expense::delete_by_id(expense_id).exec(db).await?;
    info!(id = expense_id, "Deleted expense");
    Ok(expense)
}

/// Retrieves a specific expense by its unique ID.
pub async fn get_expense_by_id<C>(db: &C, expense_id: i64) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every expense, oldest date first (ties in insertion order).
pub async fn get_all_expenses<C>(db: &C) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the expenses of one period, oldest date first.
pub async fn get_expenses_for_period<C>(db: &C, period: &Period) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::Period.eq(period.as_str()))
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the most recent expenses, newest date first, optionally filtered.
pub async fn recent_expenses<C>(
    db: &C,
    period: Option<&Period>,
    category: Option<Category>,
    limit: u64,
) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Expense::find();
    if let Some(period) = period {
        query = query.filter(expense::Column::Period.eq(period.as_str()));
    }
    if let Some(category) = category {
        query = query.filter(expense::Column::Category.eq(category));
    }

    query
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the periods that have at least one expense, most recent first.
pub async fn list_periods<C>(db: &C) -> Result<Vec<Period>>
where
    C: ConnectionTrait,
{
    let raw: Vec<String> = Expense::find()
        .select_only()
        .column(expense::Column::Period)
        .distinct()
        .order_by_desc(expense::Column::Period)
        .into_tuple()
        .all(db)
        .await?;

    debug!(count = raw.len(), "Listed expense periods");
    raw.iter().map(|period| period.parse()).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_from_input_rounds_to_two_places() {
        assert_eq!(amount_from_input(12.346).unwrap(), dec!(12.35));
        assert_eq!(amount_from_input(0.0).unwrap(), dec!(0));
        assert_eq!(amount_from_input(199.9).unwrap(), dec!(199.9));
    }

    #[test]
    fn test_amount_from_input_rejects_invalid_values() {
        for bad in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 5e28, 1e30] {
            assert!(matches!(
                amount_from_input(bad),
                Err(Error::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_amount_from_input_ceiling() {
        assert_eq!(
            amount_from_input(1_000_000_000_000.0).unwrap(),
            crate::core::MAX_AMOUNT
        );
        assert!(matches!(
            amount_from_input(1_000_000_000_000.5),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_amount_from_input_negative_zero_is_zero() {
        let amount = amount_from_input(-0.0).unwrap();
        assert!(!amount.is_sign_negative());
        assert_eq!(
            crate::core::insights::format_amount(amount),
            "₹0.00"
        );
    }

    #[test]
    fn test_parse_expense_date() {
        assert_eq!(parse_expense_date(" 2024-02-29 ").unwrap(), test_date(2024, 2, 29));
        assert!(matches!(
            parse_expense_date("29/02/2024"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_validate_expense_date_window() {
        let today = test_date(2024, 6, 15);

        assert!(validate_expense_date(today, today).is_ok());
        assert!(validate_expense_date(test_date(2023, 6, 16), today).is_ok());
        // 2024 is a leap year, so 365 days back lands on the 16th
        assert!(validate_expense_date(test_date(2023, 6, 15), today).is_err());
        assert!(matches!(
            validate_expense_date(test_date(2024, 6, 16), today),
            Err(Error::InvalidDate { reason, .. }) if reason.contains("future")
        ));
    }

    #[tokio::test]
    async fn test_create_expense_derives_period() -> Result<()> {
        let db = setup_test_db().await?;

        let expense = create_expense(
            &db,
            test_date(2024, 3, 31),
            dec!(249.999),
            Category::Groceries,
            Some("  weekly shop ".to_string()),
        )
        .await?;

        assert_eq!(expense.period, "2024-03");
        assert_eq!(expense.amount, dec!(250.00));
        assert_eq!(expense.category, Category::Groceries);
        assert_eq!(expense.note.as_deref(), Some("weekly shop"));

        let stored = get_expense_by_id(&db, expense.id).await?.unwrap();
        assert_eq!(stored.period, "2024-03");
        assert_eq!(stored.category, Category::Groceries);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_blank_note_is_none() -> Result<()> {
        let db = setup_test_db().await?;
        let expense = create_expense(
            &db,
            test_date(2024, 1, 1),
            dec!(10),
            Category::Food,
            Some("   ".to_string()),
        )
        .await?;
        assert!(expense.note.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_negative_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_expense(
            &db,
            test_date(2024, 1, 1),
            dec!(-5),
            Category::Food,
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert!(get_all_expenses(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let expense = create_test_expense(&db, "2024-01-10", Category::Food, dec!(40)).await?;

        let deleted = delete_expense(&db, expense.id).await?;
        assert_eq!(deleted.id, expense.id);
        assert!(get_expense_by_id(&db, expense.id).await?.is_none());

        let missing = delete_expense(&db, expense.id).await;
        assert!(matches!(missing, Err(Error::ExpenseNotFound { id }) if id == expense.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_expenses_ordered_by_date() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2024-02-01", Category::Food, dec!(1)).await?;
        create_test_expense(&db, "2024-01-15", Category::Food, dec!(2)).await?;
        create_test_expense(&db, "2024-01-15", Category::Bills, dec!(3)).await?;

        let amounts: Vec<Decimal> = get_all_expenses(&db)
            .await?
            .into_iter()
            .map(|e| e.amount)
            .collect();
        assert_eq!(amounts, vec![dec!(2), dec!(3), dec!(1)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_expenses_for_period() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2024-01-31", Category::Food, dec!(10)).await?;
        create_test_expense(&db, "2024-02-01", Category::Food, dec!(20)).await?;
        create_test_expense(&db, "2024-02-28", Category::Travel, dec!(30)).await?;

        let february = get_expenses_for_period(&db, &test_period("2024-02")).await?;
        assert_eq!(february.len(), 2);
        assert!(february.iter().all(|e| e.period == "2024-02"));

        let empty = get_expenses_for_period(&db, &test_period("2023-02")).await?;
        assert!(empty.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_periods_most_recent_first() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2023-12-24", Category::Shopping, dec!(10)).await?;
        create_test_expense(&db, "2024-02-01", Category::Food, dec!(20)).await?;
        create_test_expense(&db, "2024-02-11", Category::Bills, dec!(30)).await?;

        let periods = list_periods(&db).await?;
        assert_eq!(
            periods,
            vec![test_period("2024-02"), test_period("2023-12")]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_recent_expenses_newest_first_with_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2024-01-20", Category::Food, dec!(1)).await?;
        create_test_expense(&db, "2024-02-02", Category::Food, dec!(2)).await?;
        create_test_expense(&db, "2024-02-09", Category::Travel, dec!(3)).await?;
        create_test_expense(&db, "2024-02-15", Category::Food, dec!(4)).await?;

        let amounts = |rows: Vec<expense::Model>| -> Vec<Decimal> {
            rows.into_iter().map(|e| e.amount).collect()
        };

        let latest = recent_expenses(&db, None, None, 2).await?;
        assert_eq!(amounts(latest), vec![dec!(4), dec!(3)]);

        let february_food =
            recent_expenses(&db, Some(&test_period("2024-02")), Some(Category::Food), 10).await?;
        assert_eq!(amounts(february_food), vec![dec!(4), dec!(2)]);

        let none = recent_expenses(&db, None, Some(Category::Bills), 10).await?;
        assert!(none.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_amount_above_ceiling() -> Result<()> {
        let db = setup_test_db().await?;
        let huge = dec!(50_000_000_000_000_000_000_000_000_000);

        let result =
            create_expense(&db, test_date(2024, 2, 1), huge, Category::Food, None).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert!(get_all_expenses(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_stores_negative_zero_as_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let stored =
            create_expense(&db, test_date(2024, 2, 1), -Decimal::ZERO, Category::Food, None)
                .await?;
        assert!(!stored.amount.is_sign_negative());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_returns_rounded_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let stored =
            create_expense(&db, test_date(2024, 2, 1), dec!(10.005), Category::Food, None)
                .await?;
        assert_eq!(stored.amount, dec!(10.01));
        assert_eq!(get_expense_by_id(&db, stored.id).await?.unwrap().amount, dec!(10.01));
        Ok(())
    }
}
