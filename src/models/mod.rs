//! Defines the domain models: accounts, expense categories, transactions, and
//! the enriched transaction shape returned by reads.

mod account;
mod category;
mod transaction;

pub use account::{Account, AccountPatch, NewAccount};
pub use category::{CategoryPatch, ExpenseCategory, NewExpenseCategory};
pub use transaction::{
    EnrichedTransaction, NewTransaction, Transaction, TransactionPatch, parse_date,
};

/// The globally unique, opaque ID assigned to an entity when it is created.
///
/// IDs are UUID v4 strings. They are never reused and never change.
pub type EntityId = String;
