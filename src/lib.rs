//! Spendtrack is a personal finance tracker: users define bank and cash
//! accounts and expense categories, record transactions linking the two, and
//! view grouped reports (category totals, monthly trends, bank-wise totals)
//! plus CSV export.
//!
//! This library is the storage and reporting layer. HTTP routing and
//! presentation are left to the embedding application: it constructs an
//! [AppState] over one of the storage backends in [stores] and calls the
//! store traits directly.

#![warn(missing_docs)]

use rust_decimal::Decimal;

pub mod app_state;
pub mod db;
pub mod export;
pub mod models;
pub mod reports;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// An empty string was used for an expense category name.
    #[error("expense name cannot be empty")]
    EmptyExpenseName,

    /// An empty string was used for an account or category group.
    #[error("group cannot be empty")]
    EmptyGroup,

    /// An empty string was used for a category tag.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A zero or negative amount was used to create a transaction.
    ///
    /// Transactions record expenses, therefore amounts must be strictly
    /// positive.
    #[error("transaction amounts must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// A date string could not be parsed.
    ///
    /// Dates must be ISO-8601 calendar dates (`2024-01-15`) or date-times
    /// (`2024-01-15T09:30:00`).
    #[error("could not parse {0:?} as a calendar date")]
    InvalidDate(String),

    /// The bank account ID used to create or update a transaction did not
    /// match an existing account.
    #[error("the bank account ID does not refer to a valid account")]
    InvalidAccount,

    /// The expense category ID used to create or update a transaction did not
    /// match an existing category.
    #[error("the expense category ID does not refer to a valid expense category")]
    InvalidCategory,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while writing CSV output.
    #[error("could not write CSV: {0}")]
    Csv(String),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {error}");
        Error::SqlError(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error.to_string())
    }
}
