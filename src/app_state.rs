//! Implements a struct that bundles the stores handed to the embedding
//! application.

use crate::stores::{AccountStore, CategoryStore, TransactionStore};

/// The stores the application operates on.
///
/// The backends are explicit construction-time choices, not hidden globals:
/// tests build an isolated in-memory state per test case with
/// [create_memory_state](crate::stores::memory::create_memory_state), and
/// production code builds a SQLite backed state with
/// [create_sqlite_state](crate::stores::sqlite::create_sqlite_state).
#[derive(Debug, Clone)]
pub struct AppState<A, C, T>
where
    A: AccountStore,
    C: CategoryStore,
    T: TransactionStore,
{
    /// The store for bank accounts.
    pub account_store: A,
    /// The store for expense categories.
    pub category_store: C,
    /// The store for transactions.
    pub transaction_store: T,
}

impl<A, C, T> AppState<A, C, T>
where
    A: AccountStore,
    C: CategoryStore,
    T: TransactionStore,
{
    /// Create a new [AppState] from the given stores.
    pub fn new(account_store: A, category_store: C, transaction_store: T) -> Self {
        Self {
            account_store,
            category_store,
            transaction_store,
        }
    }
}
