//! Database configuration module for `SmartKharch`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Budget, Expense};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::info;

/// Default database location, created on first start
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/smartkharch.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Extracts the file path from a `sqlite://` URL; `None` for in-memory databases.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the `SQLite` database named by `database_url`.
///
/// The parent directory of a file database is created if it does not exist yet.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    info!(url = database_url, "Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the expense and budget tables if they do not exist yet.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut expense_table = schema.create_table_from_entity(Expense);
    let mut budget_table = schema.create_table_from_entity(Budget);

    expense_table.if_not_exists();
    budget_table.if_not_exists();

    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&budget_table)).await?;

    Ok(())
}
