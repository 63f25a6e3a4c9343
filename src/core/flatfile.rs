//! Flat-file tables - CSV import and export of expenses and budgets.
//!
//! The expense table has the columns `Date,Amount,Category,Note,Month` and the budget
//! table has `Month` followed by one column per category. Columns are located by
//! header name, so files written by other tools load as long as the headers match.
//! Malformed rows are skipped with a warning instead of failing the whole file; the
//! `Month` column of expense rows is ignored and recomputed from `Date`.

use crate::{
    config::app::AppConfig,
    core::{Category, Period, budget, budget::BudgetMap, checked_money, expense, ledger},
    entities::{budget as budget_entity, expense as expense_entity},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::{io, path::Path, str::FromStr};
use tracing::{info, instrument, warn};

/// Column headers of the expense table
pub const EXPENSE_HEADERS: [&str; 5] = ["Date", "Amount", "Category", "Note", "Month"];

/// Header of the period column in both tables
pub const PERIOD_HEADER: &str = "Month";

/// An expense read from the flat file, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// Day the money was spent
    pub date: NaiveDate,
    /// Amount spent
    pub amount: Decimal,
    /// Category of the expense
    pub category: Category,
    /// Optional note
    pub note: Option<String>,
}

/// A budget read from the flat file, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRow {
    /// Period the budget applies to
    pub period: Period,
    /// Limit per category
    pub amounts: BudgetMap,
}

/// Rows parsed from a table and how many were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable<T> {
    /// Rows that parsed cleanly
    pub rows: Vec<T>,
    /// Rows skipped as malformed
    pub skipped: usize,
}

/// Counts of what a startup import stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Expenses stored
    pub expenses: usize,
    /// Budgets stored
    pub budgets: usize,
    /// Malformed rows skipped across both tables
    pub skipped: usize,
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

fn required_column(headers: &csv::StringRecord, name: &str, table: &str) -> Result<usize> {
    column_index(headers, name).ok_or_else(|| Error::Config {
        message: format!("{table} table has no '{name}' column"),
    })
}

/// Accepts `YYYY-MM-DD`, also with a trailing time as written by spreadsheet tools.
fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Reads an empty or `nan` cell as zero.
fn parse_budget_cell(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .ok()
        .and_then(|amount| checked_money(amount).ok())
}

fn parse_expense_record(
    record: &csv::StringRecord,
    date_col: usize,
    amount_col: usize,
    category_col: usize,
    note_col: Option<usize>,
) -> std::result::Result<ExpenseRow, String> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let date = parse_row_date(field(date_col))
        .ok_or_else(|| format!("unreadable date '{}'", field(date_col)))?;
    let amount = Decimal::from_str(field(amount_col).trim())
        .ok()
        .and_then(|amount| checked_money(amount).ok())
        .ok_or_else(|| format!("invalid amount '{}'", field(amount_col)))?;
    let category = Category::from_str(field(category_col)).map_err(|e| e.to_string())?;
    let note = note_col
        .map(field)
        .map(str::trim)
        .filter(|note| !note.is_empty() && !note.eq_ignore_ascii_case("nan"))
        .map(ToString::to_string);

    Ok(ExpenseRow {
        date,
        amount,
        category,
        note,
    })
}

/// Parses an expense table.
///
/// # Errors
/// Fails when the CSV itself is unreadable or a required column is missing.
pub fn read_expenses<R: io::Read>(reader: R) -> Result<ParsedTable<ExpenseRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let date_col = required_column(&headers, "Date", "Expense")?;
    let amount_col = required_column(&headers, "Amount", "Expense")?;
    let category_col = required_column(&headers, "Category", "Expense")?;
    let note_col = column_index(&headers, "Note");

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        match parse_expense_record(&record, date_col, amount_col, category_col, note_col) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                // Row 1 is the header
                warn!(row = i + 2, %reason, "Skipping expense row");
                skipped += 1;
            }
        }
    }
    Ok(ParsedTable { rows, skipped })
}

/// Parses a budget table. Category columns that are absent read as zero.
///
/// # Errors
/// Fails when the CSV itself is unreadable or the `Month` column is missing.
pub fn read_budgets<R: io::Read>(reader: R) -> Result<ParsedTable<BudgetRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let period_col = required_column(&headers, PERIOD_HEADER, "Budget")?;
    let category_cols: Vec<(Category, Option<usize>)> = Category::ALL
        .into_iter()
        .map(|category| (category, column_index(&headers, category.label())))
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let raw_period = record.get(period_col).unwrap_or_default();
        let Ok(period) = Period::from_str(raw_period) else {
            warn!(row = i + 2, period = raw_period, "Skipping budget row with invalid month");
            skipped += 1;
            continue;
        };

        let amounts: Option<BudgetMap> = category_cols
            .iter()
            .map(|&(category, col)| {
                let cell = col.and_then(|index| record.get(index)).unwrap_or_default();
                parse_budget_cell(cell).map(|amount| (category, amount))
            })
            .collect();

        match amounts {
            Some(amounts) => rows.push(BudgetRow { period, amounts }),
            None => {
                warn!(row = i + 2, %period, "Skipping budget row with invalid amount");
                skipped += 1;
            }
        }
    }
    Ok(ParsedTable { rows, skipped })
}

/// Writes the expense table.
pub fn write_expenses<W: io::Write>(writer: W, expenses: &[expense_entity::Model]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPENSE_HEADERS)?;
    for expense in expenses {
        csv_writer.write_record([
            expense.date.to_string().as_str(),
            expense.amount.to_string().as_str(),
            expense.category.label(),
            expense.note.as_deref().unwrap_or_default(),
            expense.period.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the budget table.
pub fn write_budgets<W: io::Write>(writer: W, budgets: &[budget_entity::Model]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut headers = vec![PERIOD_HEADER];
    headers.extend(Category::ALL.map(Category::label));
    csv_writer.write_record(&headers)?;

    for row in budgets {
        let mut record = vec![row.period.clone()];
        record.extend(
            Category::ALL.map(|category| row.amount_for(category).to_string()),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders both tables of a ledger as CSV bytes: `(expenses, budgets)`.
pub fn export_ledger(ledger: &ledger::Ledger) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut expenses = Vec::new();
    write_expenses(&mut expenses, &ledger.expenses)?;
    let mut budgets = Vec::new();
    write_budgets(&mut budgets, &ledger.budgets)?;
    Ok((expenses, budgets))
}

/// Writes exported tables to the paths configured in `config`, if any.
///
/// Returns the paths that were written.
pub async fn save_flat_files<'a>(
    config: &'a AppConfig,
    expenses: &[u8],
    budgets: &[u8],
) -> Result<Vec<&'a Path>> {
    let mut written = Vec::new();
    if let Some(path) = config.expenses_csv.as_deref() {
        tokio::fs::write(path, expenses).await?;
        written.push(path);
    }
    if let Some(path) = config.budgets_csv.as_deref() {
        tokio::fs::write(path, budgets).await?;
        written.push(path);
    }
    info!(files = written.len(), "Saved flat-file tables");
    Ok(written)
}

/// Stores parsed rows in one database transaction.
pub async fn store_rows<C>(
    db: &C,
    expenses: &[ExpenseRow],
    budgets: &[BudgetRow],
) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    for row in expenses {
        expense::create_expense(&txn, row.date, row.amount, row.category, row.note.clone())
            .await?;
    }
    for row in budgets {
        budget::save_budget(&txn, &row.period, &row.amounts).await?;
    }
    txn.commit().await?;
    Ok(())
}

async fn read_table<T>(
    path: Option<&Path>,
    parse: impl Fn(&[u8]) -> Result<ParsedTable<T>>,
) -> Result<ParsedTable<T>> {
    let empty = || ParsedTable {
        rows: Vec::new(),
        skipped: 0,
    };
    let Some(path) = path else {
        return Ok(empty());
    };
    match tokio::fs::read(path).await {
        Ok(contents) => {
            info!(path = %path.display(), "Reading flat-file table");
            parse(&contents)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Flat-file table not found, nothing to import");
            Ok(empty())
        }
        Err(e) => Err(e.into()),
    }
}

/// Seeds an empty database from the configured flat files.
///
/// Does nothing when the database already holds expenses or budgets, so restarting
/// never duplicates data.
#[instrument(skip(db, config))]
pub async fn import_flat_files<C>(db: &C, config: &AppConfig) -> Result<ImportSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    if !ledger::load_ledger(db).await?.is_empty() {
        info!("Database already has data, skipping flat-file import");
        return Ok(ImportSummary::default());
    }

    let expenses =
        read_table(config.expenses_csv.as_deref(), |bytes| read_expenses(bytes)).await?;
    let budgets =
        read_table(config.budgets_csv.as_deref(), |bytes| read_budgets(bytes)).await?;
    store_rows(db, &expenses.rows, &budgets.rows).await?;

    let summary = ImportSummary {
        expenses: expenses.rows.len(),
        budgets: budgets.rows.len(),
        skipped: expenses.skipped + budgets.skipped,
    };
    info!(
        expenses = summary.expenses,
        budgets = summary.budgets,
        skipped = summary.skipped,
        "Imported flat-file tables"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    const EXPENSES_CSV: &str = "\
Date,Amount,Category,Note,Month
2024-01-15,120.5,Food,lunch,2024-01
2024-02-01 00:00:00,300.0,Bills,,2024-02
not-a-date,10,Food,,2024-02
2024-02-03,abc,Food,,2024-02
2024-02-04,15,Pets,,2024-02
2024-02-05,99,Travel,nan,1999-01
2024-02-06,50000000000000000000000000000,Food,,2024-02
2024-02-07,-0,Food,,2024-02
";

    const BUDGETS_CSV: &str = "\
Month,Food,Shopping,Travel,Groceries,Bills,Others
2024-01,500,0,1000,,2000,100
2024-02,600.0,0,0,0,0,0
Jan,1,1,1,1,1,1
2024-03,-5,0,0,0,0,0
2024-04,0,0,2000000000000,0,0,0
";

    #[test]
    fn test_read_expenses_skips_malformed_rows() {
        let table = read_expenses(EXPENSES_CSV.as_bytes()).unwrap();

        assert_eq!(table.skipped, 4);
        assert!(!table.rows[3].amount.is_sign_negative());
        assert_eq!(
            table.rows[..3],
            vec![
                ExpenseRow {
                    date: test_date(2024, 1, 15),
                    amount: dec!(120.5),
                    category: Category::Food,
                    note: Some("lunch".to_string()),
                },
                ExpenseRow {
                    date: test_date(2024, 2, 1),
                    amount: dec!(300.0),
                    category: Category::Bills,
                    note: None,
                },
                ExpenseRow {
                    date: test_date(2024, 2, 5),
                    amount: dec!(99),
                    category: Category::Travel,
                    note: None,
                },
            ]
        );
        assert_eq!(table.rows.len(), 4);
    }

    #[test]
    fn test_read_expenses_requires_columns() {
        let result = read_expenses("Date,Category\n2024-01-01,Food\n".as_bytes());
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("Amount")));
    }

    #[test]
    fn test_read_budgets() {
        let table = read_budgets(BUDGETS_CSV.as_bytes()).unwrap();

        assert_eq!(table.skipped, 3);
        assert_eq!(table.rows.len(), 2);
        let january = &table.rows[0];
        assert_eq!(january.period, test_period("2024-01"));
        assert_eq!(january.amounts[&Category::Food], dec!(500));
        assert_eq!(january.amounts[&Category::Groceries], dec!(0));
        assert_eq!(january.amounts[&Category::Bills], dec!(2000));
        assert_eq!(table.rows[1].amounts[&Category::Food], dec!(600));
    }

    #[test]
    fn test_read_budgets_missing_category_column_is_zero() {
        let table = read_budgets("Month,Food\n2024-05,250\n".as_bytes()).unwrap();
        let amounts = &table.rows[0].amounts;
        assert_eq!(amounts.len(), Category::ALL.len());
        assert_eq!(amounts[&Category::Food], dec!(250));
        assert_eq!(amounts[&Category::Others], dec!(0));
    }

    #[tokio::test]
    async fn test_export_then_reimport() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2024-01-15", Category::Food, dec!(120.5)).await?;
        expense::create_expense(
            &db,
            test_date(2024, 1, 20),
            dec!(45),
            Category::Shopping,
            Some("shoes, socks".to_string()),
        )
        .await?;
        budget::save_budget(
            &db,
            &test_period("2024-01"),
            &[(Category::Food, dec!(500))].into_iter().collect(),
        )
        .await?;

        let ledger = ledger::load_ledger(&db).await?;
        let (expense_bytes, budget_bytes) = export_ledger(&ledger)?;

        let exported = String::from_utf8(expense_bytes.clone()).unwrap();
        assert!(exported.starts_with("Date,Amount,Category,Note,Month\n"));
        assert!(exported.contains("\"shoes, socks\""));

        let expenses = read_expenses(expense_bytes.as_slice())?;
        let budgets = read_budgets(budget_bytes.as_slice())?;
        assert_eq!(expenses.skipped, 0);
        assert_eq!(expenses.rows.len(), 2);
        assert_eq!(expenses.rows[1].note.as_deref(), Some("shoes, socks"));
        assert_eq!(budgets.rows[0].amounts[&Category::Food], dec!(500));

        let copy = setup_test_db().await?;
        store_rows(&copy, &expenses.rows, &budgets.rows).await?;
        let reloaded = ledger::load_ledger(&copy).await?;
        assert_eq!(reloaded.expenses.len(), 2);
        assert_eq!(reloaded.expenses[0].period, "2024-01");
        assert_eq!(reloaded.budgets.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_skips_non_empty_database() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_expense(&db, "2024-01-15", Category::Food, dec!(1)).await?;

        let config = AppConfig {
            expenses_csv: Some("does-not-matter.csv".into()),
            ..AppConfig::default()
        };
        let summary = import_flat_files(&db, &config).await?;
        assert_eq!(summary, ImportSummary::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_import_with_missing_files_is_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let config = AppConfig {
            expenses_csv: Some("definitely/missing/expenses.csv".into()),
            budgets_csv: None,
            ..AppConfig::default()
        };
        let summary = import_flat_files(&db, &config).await?;
        assert_eq!(summary, ImportSummary::default());
        assert!(ledger::load_ledger(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_flat_files_writes_configured_paths() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("smartkharch-save-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await?;
        let config = AppConfig {
            expenses_csv: Some(dir.join("expenses.csv")),
            budgets_csv: None,
            ..AppConfig::default()
        };

        let written = save_flat_files(&config, b"Date,Amount\n", b"Month\n").await?;
        assert_eq!(written, vec![dir.join("expenses.csv").as_path()]);
        assert_eq!(
            tokio::fs::read_to_string(dir.join("expenses.csv")).await?,
            "Date,Amount\n"
        );
        assert!(!dir.join("budgets.csv").exists());

        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_save_flat_files_without_paths_writes_nothing() -> Result<()> {
        let config = AppConfig::default();
        let written = save_flat_files(&config, b"", b"").await?;
        assert!(written.is_empty());
        Ok(())
    }
}
