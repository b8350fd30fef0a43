//! Defines the account store trait.

use crate::{
    Error,
    models::{Account, AccountPatch, NewAccount},
};

/// Handles the creation and retrieval of bank accounts.
pub trait AccountStore {
    /// Retrieve all accounts from the store.
    ///
    /// The order is unspecified; callers must not depend on it.
    fn list(&self) -> Result<Vec<Account>, Error>;

    /// Retrieve the account with `id`, or `None` if no such account exists.
    ///
    /// Absence is a normal outcome, not an error.
    fn get(&self, id: &str) -> Result<Option<Account>, Error>;

    /// Create a new account in the store, assigning it a fresh ID and
    /// creation time.
    fn create(&mut self, new_account: NewAccount) -> Result<Account, Error>;

    /// Merge `patch` into the account with `id`.
    ///
    /// Returns the updated account, or `None` if no such account exists.
    fn update(&mut self, id: &str, patch: AccountPatch) -> Result<Option<Account>, Error>;

    /// Remove the account with `id`, reporting whether anything was removed.
    ///
    /// Deleting a non-existent ID is a no-op, not an error. Transactions
    /// referencing a deleted account disappear from all transaction reads.
    fn delete(&mut self, id: &str) -> Result<bool, Error>;
}
