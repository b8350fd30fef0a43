/*! This module defines and implements traits for interacting with the
application's SQLite database. */

use rusqlite::{Connection, Error, Row};

use crate::stores::sqlite::{SQLiteAccountStore, SQLiteCategoryStore, SQLiteTransactionStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping a `rusqlite::Row` from a SQLite database to a concrete
/// rust type.
pub trait MapRow {
    /// The type to map the row to.
    type ReturnType;

    /// Convert `row` into [Self::ReturnType].
    ///
    /// # Errors
    /// Returns an error if a column value cannot be converted.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert `row` into [Self::ReturnType], reading columns starting at
    /// `offset`. Used when the row is the result of a join and the model's
    /// columns do not start at index zero.
    ///
    /// # Errors
    /// Returns an error if a column value cannot be converted.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for all domain models in the database that `connection`
/// points to.
///
/// Safe to call on a database that already has the tables.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    SQLiteAccountStore::create_table(connection)?;
    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}
