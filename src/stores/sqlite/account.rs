//! Implements a SQLite backed account store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Account, AccountPatch, NewAccount},
    stores::AccountStore,
};

/// Stores bank accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "id, account_name, account_group, description, created_at";

impl SQLiteAccountStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Fetch the account with `id`, or `None` if no row matches.
    pub(crate) fn select_by_id(
        connection: &Connection,
        id: &str,
    ) -> Result<Option<Account>, rusqlite::Error> {
        connection
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM bank_accounts WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
    }
}

impl AccountStore for SQLiteAccountStore {
    /// Retrieve all accounts in the database, in storage order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn list(&self) -> Result<Vec<Account>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM bank_accounts"))?
            .query_map([], Self::map_row)?
            .map(|maybe_account| maybe_account.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the account with `id`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get(&self, id: &str) -> Result<Option<Account>, Error> {
        let connection = self.connection.lock().unwrap();

        Ok(Self::select_by_id(&connection, id)?)
    }

    /// Create a new account in the database.
    ///
    /// # Errors
    /// Returns the validation errors from [Account::new], or an
    /// [Error::SqlError] if there is a SQL error.
    fn create(&mut self, new_account: NewAccount) -> Result<Account, Error> {
        let account = Account::new(new_account)?;

        self.connection.lock().unwrap().execute(
            "INSERT INTO bank_accounts (id, account_name, account_group, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &account.id,
                &account.account_name,
                &account.group,
                &account.description,
                &account.created_at,
            ),
        )?;

        Ok(account)
    }

    /// Merge `patch` into the account with `id`.
    ///
    /// # Errors
    /// Returns the validation errors from [Account::apply], or an
    /// [Error::SqlError] if there is a SQL error.
    fn update(&mut self, id: &str, patch: AccountPatch) -> Result<Option<Account>, Error> {
        let connection = self.connection.lock().unwrap();

        let Some(existing) = Self::select_by_id(&connection, id)? else {
            return Ok(None);
        };

        let updated = existing.apply(patch)?;

        connection.execute(
            "UPDATE bank_accounts SET account_name = ?1, account_group = ?2, description = ?3
             WHERE id = ?4",
            (
                &updated.account_name,
                &updated.group,
                &updated.description,
                &updated.id,
            ),
        )?;

        Ok(Some(updated))
    }

    /// Remove the account with `id`, reporting whether a row was removed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM bank_accounts WHERE id = ?1", [id])?;

        Ok(rows_deleted > 0)
    }
}

impl CreateTable for SQLiteAccountStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS bank_accounts (
                    id TEXT PRIMARY KEY,
                    account_name TEXT NOT NULL,
                    account_group TEXT NOT NULL,
                    description TEXT,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteAccountStore {
    type ReturnType = Account;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Account {
            id: row.get(offset)?,
            account_name: row.get(offset + 1)?,
            group: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            created_at: row.get(offset + 4)?,
        })
    }
}

#[cfg(test)]
mod sqlite_account_store_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        models::{AccountPatch, NewAccount},
        stores::{
            AccountStore,
            sqlite::{SqliteAppState, create_sqlite_state},
        },
    };

    fn get_app_state() -> SqliteAppState {
        let connection = Connection::open_in_memory().unwrap();
        create_sqlite_state(connection).unwrap()
    }

    fn new_account() -> NewAccount {
        NewAccount {
            account_name: "HDFC".to_string(),
            group: "savings".to_string(),
            description: Some("daily driver".to_string()),
        }
    }

    #[test]
    fn create_then_get_returns_equal_account() {
        let mut state = get_app_state();

        let account = state.account_store.create(new_account()).unwrap();

        let got = state.account_store.get(&account.id).unwrap();

        assert_eq!(got, Some(account));
    }

    #[test]
    fn create_fails_on_empty_account_name() {
        let mut state = get_app_state();

        let result = state.account_store.create(NewAccount {
            account_name: "".to_string(),
            ..new_account()
        });

        assert_eq!(result, Err(Error::EmptyAccountName));
    }

    #[test]
    fn get_missing_account_is_none() {
        let state = get_app_state();

        assert_eq!(state.account_store.get("no-such-id"), Ok(None));
    }

    #[test]
    fn list_returns_all_accounts() {
        let mut state = get_app_state();

        let first = state.account_store.create(new_account()).unwrap();
        let second = state
            .account_store
            .create(NewAccount {
                account_name: "Wallet".to_string(),
                group: "cash".to_string(),
                description: None,
            })
            .unwrap();

        let mut got = state.account_store.list().unwrap();
        got.sort_by(|a, b| a.account_name.cmp(&b.account_name));

        assert_eq!(got, vec![first, second]);
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let mut state = get_app_state();
        let account = state.account_store.create(new_account()).unwrap();

        let updated = state
            .account_store
            .update(
                &account.id,
                AccountPatch {
                    group: Some("cash".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.group, "cash");
        assert_eq!(updated.account_name, account.account_name);
        assert_eq!(updated.id, account.id);

        let got = state.account_store.get(&account.id).unwrap();
        assert_eq!(got, Some(updated));
    }

    #[test]
    fn update_empty_patch_is_identity() {
        let mut state = get_app_state();
        let account = state.account_store.create(new_account()).unwrap();

        let updated = state
            .account_store
            .update(&account.id, AccountPatch::default())
            .unwrap();

        assert_eq!(updated, Some(account));
    }

    #[test]
    fn update_missing_account_is_none() {
        let mut state = get_app_state();

        let result = state
            .account_store
            .update("no-such-id", AccountPatch::default());

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn delete_twice_reports_noop_second_time() {
        let mut state = get_app_state();
        let account = state.account_store.create(new_account()).unwrap();

        assert_eq!(state.account_store.delete(&account.id), Ok(true));
        assert_eq!(state.account_store.delete(&account.id), Ok(false));
        assert_eq!(state.account_store.get(&account.id), Ok(None));
    }
}
