//! Implements a SQLite backed expense category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{CategoryPatch, ExpenseCategory, NewExpenseCategory},
    stores::CategoryStore,
};

/// Stores expense categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "id, name, category_group, category, created_at";

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Fetch the category with `id`, or `None` if no row matches.
    pub(crate) fn select_by_id(
        connection: &Connection,
        id: &str,
    ) -> Result<Option<ExpenseCategory>, rusqlite::Error> {
        connection
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM expense_categories WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Retrieve all expense categories in the database, in storage order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn list(&self) -> Result<Vec<ExpenseCategory>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM expense_categories"))?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the expense category with `id`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get(&self, id: &str) -> Result<Option<ExpenseCategory>, Error> {
        let connection = self.connection.lock().unwrap();

        Ok(Self::select_by_id(&connection, id)?)
    }

    /// Create a new expense category in the database.
    ///
    /// # Errors
    /// Returns the validation errors from [ExpenseCategory::new], or an
    /// [Error::SqlError] if there is a SQL error.
    fn create(&mut self, new_category: NewExpenseCategory) -> Result<ExpenseCategory, Error> {
        let category = ExpenseCategory::new(new_category)?;

        self.connection.lock().unwrap().execute(
            "INSERT INTO expense_categories (id, name, category_group, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &category.id,
                &category.name,
                &category.group,
                &category.category,
                &category.created_at,
            ),
        )?;

        Ok(category)
    }

    /// Merge `patch` into the expense category with `id`.
    ///
    /// # Errors
    /// Returns the validation errors from [ExpenseCategory::apply], or an
    /// [Error::SqlError] if there is a SQL error.
    fn update(
        &mut self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<ExpenseCategory>, Error> {
        let connection = self.connection.lock().unwrap();

        let Some(existing) = Self::select_by_id(&connection, id)? else {
            return Ok(None);
        };

        let updated = existing.apply(patch)?;

        connection.execute(
            "UPDATE expense_categories SET name = ?1, category_group = ?2, category = ?3
             WHERE id = ?4",
            (
                &updated.name,
                &updated.group,
                &updated.category,
                &updated.id,
            ),
        )?;

        Ok(Some(updated))
    }

    /// Remove the expense category with `id`, reporting whether a row was
    /// removed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense_categories WHERE id = ?1", [id])?;

        Ok(rows_deleted > 0)
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense_categories (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    category_group TEXT NOT NULL,
                    category TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = ExpenseCategory;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(ExpenseCategory {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            group: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            created_at: row.get(offset + 4)?,
        })
    }
}
