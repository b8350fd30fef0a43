//! Contains the SQLite backed stores and a convenience constructor for an
//! [AppState] that uses them.

pub mod account;
pub mod category;
pub mod transaction;

pub use account::SQLiteAccountStore;
pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqliteAppState =
    AppState<SQLiteAccountStore, SQLiteCategoryStore, SQLiteTransactionStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_sqlite_state(db_connection: Connection) -> Result<SqliteAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        SQLiteAccountStore::new(connection.clone()),
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection),
    ))
}
