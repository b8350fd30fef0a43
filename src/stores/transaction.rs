//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{EnrichedTransaction, NewTransaction, TransactionPatch},
    reports::{self, RollupRow},
};

/// Handles the creation and retrieval of transactions.
///
/// Every read returns the [EnrichedTransaction] shape: the transaction joined
/// with its account and expense category, computed at read time. Transactions
/// whose account or category has been deleted are omitted from list results
/// and absent from direct lookups, so every transaction a caller sees is
/// fully joinable.
pub trait TransactionStore {
    /// Retrieve all fully joinable transactions, most recent first.
    ///
    /// Ordered descending by transaction date; ties break in a stable order.
    fn list(&self) -> Result<Vec<EnrichedTransaction>, Error>;

    /// Retrieve the transaction with `id`.
    ///
    /// Returns `None` if no such transaction exists, or if its account or
    /// category has since been deleted.
    fn get(&self, id: &str) -> Result<Option<EnrichedTransaction>, Error>;

    /// Create a new transaction in the store.
    ///
    /// # Errors
    /// Returns [Error::InvalidAccount] or [Error::InvalidCategory] if a
    /// referenced entity does not exist at write time, and the validation
    /// errors from [crate::models::Transaction::new] for bad input.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<EnrichedTransaction, Error>;

    /// Merge `patch` into the transaction with `id`.
    ///
    /// Returns the updated transaction, or `None` if it does not exist or is
    /// no longer fully joinable.
    ///
    /// # Errors
    /// Returns [Error::InvalidAccount] or [Error::InvalidCategory] if the
    /// patch points a reference at a non-existent entity.
    fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<EnrichedTransaction>, Error>;

    /// Remove the transaction with `id`, reporting whether anything was
    /// removed. Deleting a non-existent ID is a no-op, not an error.
    fn delete(&mut self, id: &str) -> Result<bool, Error>;

    /// Retrieve transactions whose date falls within `date_range`, inclusive
    /// on both ends.
    ///
    /// An inverted range (start after end) yields an empty vec. Results use
    /// the same ordering and visibility rules as [TransactionStore::list].
    fn filter_by_date_range(
        &self,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<EnrichedTransaction>, Error>;

    /// Total and count of all transactions grouped by the mid-level category
    /// tag.
    fn category_rollup(&self) -> Result<Vec<RollupRow>, Error> {
        Ok(reports::category_rollup(&self.list()?))
    }

    /// Total and count of all transactions grouped by calendar month, in
    /// chronological order.
    fn monthly_rollup(&self) -> Result<Vec<RollupRow>, Error> {
        Ok(reports::monthly_rollup(&self.list()?))
    }

    /// Total and count of all transactions grouped by account name.
    fn bank_rollup(&self) -> Result<Vec<RollupRow>, Error> {
        Ok(reports::bank_rollup(&self.list()?))
    }
}
