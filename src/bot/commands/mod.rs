//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Budget commands
pub mod budget;

/// Expense commands
pub mod expense;

/// General utility commands
pub mod general;

/// Alert, insight and export commands
pub mod report;

// Export commands
pub use budget::*;
pub use expense::*;
pub use general::*;
pub use report::*;
