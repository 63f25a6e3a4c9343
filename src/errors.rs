//! Unified error types and result handling for `SmartKharch`.
//!
//! Every fallible operation in the application shell returns [`Result`]. The alert
//! engine itself is total over validated input and never produces these errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// All errors surfaced by the application shell.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A flat-file table could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Amount is negative or not representable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount as entered
        amount: String,
    },

    /// Date is malformed or outside the accepted window
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate {
        /// The rejected date as entered
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Period is not a `YYYY-MM` value
    #[error("Invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod {
        /// The rejected period as entered
        value: String,
    },

    /// Category is not one of the fixed set
    #[error("Unknown category '{name}'")]
    UnknownCategory {
        /// The rejected category label
        name: String,
    },

    /// No expense with the given ID exists
    #[error("Expense #{id} not found")]
    ExpenseNotFound {
        /// The requested expense ID
        id: i64,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Builds an [`Error::InvalidAmount`] for a decimal amount.
    #[must_use]
    pub fn invalid_amount(amount: Decimal) -> Self {
        Self::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Whether the error comes from rejected user input rather than a system failure.
    ///
    /// Commands answer these with a plain message instead of escalating them.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidPeriod { .. }
                | Self::UnknownCategory { .. }
                | Self::ExpenseNotFound { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
