//! Defines the expense category store trait.

use crate::{
    Error,
    models::{CategoryPatch, ExpenseCategory, NewExpenseCategory},
};

/// Handles the creation and retrieval of expense categories.
pub trait CategoryStore {
    /// Retrieve all expense categories from the store.
    ///
    /// The order is unspecified; callers must not depend on it.
    fn list(&self) -> Result<Vec<ExpenseCategory>, Error>;

    /// Retrieve the category with `id`, or `None` if no such category exists.
    fn get(&self, id: &str) -> Result<Option<ExpenseCategory>, Error>;

    /// Create a new expense category in the store, assigning it a fresh ID
    /// and creation time.
    fn create(&mut self, new_category: NewExpenseCategory) -> Result<ExpenseCategory, Error>;

    /// Merge `patch` into the category with `id`.
    ///
    /// Returns the updated category, or `None` if no such category exists.
    fn update(&mut self, id: &str, patch: CategoryPatch)
    -> Result<Option<ExpenseCategory>, Error>;

    /// Remove the category with `id`, reporting whether anything was removed.
    ///
    /// Deleting a non-existent ID is a no-op, not an error. Transactions
    /// referencing a deleted category disappear from all transaction reads.
    fn delete(&mut self, id: &str) -> Result<bool, Error>;
}
