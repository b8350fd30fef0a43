//! Implements a SQLite backed transaction store.

use std::{
    ops::RangeInclusive,
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{EnrichedTransaction, NewTransaction, Transaction, TransactionPatch},
    stores::{
        TransactionStore,
        sqlite::{SQLiteAccountStore, SQLiteCategoryStore},
    },
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction references the
/// [Account](crate::models::Account) and
/// [ExpenseCategory](crate::models::ExpenseCategory) models, their tables
/// must be set up in the database.
///
/// Amounts are stored as their exact decimal string so no value ever passes
/// through binary floating point. Every read joins against the account and
/// category tables; rows where either join fails are invisible.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

const SELECT_ENRICHED: &str = "SELECT t.id, t.bank_account_id, t.expense_category_id, \
     t.description, t.amount, t.transaction_date, t.created_at, \
     a.id, a.account_name, a.account_group, a.description, a.created_at, \
     c.id, c.name, c.category_group, c.category, c.created_at \
     FROM transactions t \
     INNER JOIN bank_accounts a ON a.id = t.bank_account_id \
     INNER JOIN expense_categories c ON c.id = t.expense_category_id";

const ORDER_MOST_RECENT_FIRST: &str = "ORDER BY t.transaction_date DESC, t.id DESC";

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn select_enriched_by_id(
        connection: &Connection,
        id: &str,
    ) -> Result<Option<EnrichedTransaction>, rusqlite::Error> {
        connection
            .prepare(&format!("{SELECT_ENRICHED} WHERE t.id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Retrieve all fully joinable transactions, most recent first.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn list(&self) -> Result<Vec<EnrichedTransaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("{SELECT_ENRICHED} {ORDER_MOST_RECENT_FIRST}"))?
            .query_map([], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the transaction with `id`, joined with its account and
    /// category. Dangling transactions are absent.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get(&self, id: &str) -> Result<Option<EnrichedTransaction>, Error> {
        let connection = self.connection.lock().unwrap();

        Ok(Self::select_enriched_by_id(&connection, id)?)
    }

    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAccount] if the account ID does not refer to an
    ///   existing account,
    /// - [Error::InvalidCategory] if the category ID does not refer to an
    ///   existing category,
    /// - the validation errors from [Transaction::new],
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<EnrichedTransaction, Error> {
        let transaction = Transaction::new(new_transaction)?;

        let connection = self.connection.lock().unwrap();

        let bank_account =
            SQLiteAccountStore::select_by_id(&connection, &transaction.bank_account_id)?
                .ok_or(Error::InvalidAccount)?;
        let expense_category =
            SQLiteCategoryStore::select_by_id(&connection, &transaction.expense_category_id)?
                .ok_or(Error::InvalidCategory)?;

        connection.execute(
            "INSERT INTO transactions \
             (id, bank_account_id, expense_category_id, description, amount, transaction_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &transaction.id,
                &transaction.bank_account_id,
                &transaction.expense_category_id,
                &transaction.description,
                &transaction.amount.to_string(),
                &transaction.transaction_date,
                &transaction.created_at,
            ),
        )?;

        Ok(EnrichedTransaction {
            transaction,
            bank_account,
            expense_category,
        })
    }

    /// Merge `patch` into the transaction with `id`.
    ///
    /// Returns `None` if the transaction does not exist or is no longer
    /// fully joinable.
    ///
    /// # Errors
    /// Returns [Error::InvalidAccount] or [Error::InvalidCategory] if the
    /// patch points a reference at a non-existent row, the validation errors
    /// from [Transaction::apply], or an [Error::SqlError] for other SQL
    /// errors.
    fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<EnrichedTransaction>, Error> {
        let connection = self.connection.lock().unwrap();

        let Some(existing) = Self::select_enriched_by_id(&connection, id)? else {
            return Ok(None);
        };

        let updated = existing.transaction.apply(patch)?;

        let bank_account = SQLiteAccountStore::select_by_id(&connection, &updated.bank_account_id)?
            .ok_or(Error::InvalidAccount)?;
        let expense_category =
            SQLiteCategoryStore::select_by_id(&connection, &updated.expense_category_id)?
                .ok_or(Error::InvalidCategory)?;

        connection.execute(
            "UPDATE transactions SET bank_account_id = ?1, expense_category_id = ?2, \
             description = ?3, amount = ?4, transaction_date = ?5 WHERE id = ?6",
            (
                &updated.bank_account_id,
                &updated.expense_category_id,
                &updated.description,
                &updated.amount.to_string(),
                &updated.transaction_date,
                &updated.id,
            ),
        )?;

        Ok(Some(EnrichedTransaction {
            transaction: updated,
            bank_account,
            expense_category,
        }))
    }

    /// Remove the transaction with `id`, reporting whether a row was removed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;

        Ok(rows_deleted > 0)
    }

    /// Retrieve transactions dated within `date_range` (inclusive), most
    /// recent first.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn filter_by_date_range(
        &self,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<EnrichedTransaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "{SELECT_ENRICHED} WHERE t.transaction_date BETWEEN ?1 AND ?2 \
                 {ORDER_MOST_RECENT_FIRST}"
            ))?
            .query_map(
                [
                    date_range.start().to_string(),
                    date_range.end().to_string(),
                ],
                Self::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // No REFERENCES clauses: deleting a referenced account or category
        // must succeed, after which the INNER JOIN hides the orphaned rows.
        // Reference validity at write time is checked by explicit lookups
        // instead.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                    id TEXT PRIMARY KEY,
                    bank_account_id TEXT NOT NULL,
                    expense_category_id TEXT NOT NULL,
                    description TEXT,
                    amount TEXT NOT NULL,
                    transaction_date TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = EnrichedTransaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let amount_text: String = row.get(offset + 4)?;
        let amount = Decimal::from_str(&amount_text).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        let transaction = Transaction {
            id: row.get(offset)?,
            bank_account_id: row.get(offset + 1)?,
            expense_category_id: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            amount,
            transaction_date: row.get(offset + 5)?,
            created_at: row.get(offset + 6)?,
        };

        Ok(EnrichedTransaction {
            transaction,
            bank_account: SQLiteAccountStore::map_row_with_offset(row, offset + 7)?,
            expense_category: SQLiteCategoryStore::map_row_with_offset(row, offset + 12)?,
        })
    }
}
