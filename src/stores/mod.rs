//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).
//!
//! Two interchangeable backends satisfy the same contracts: [memory] for
//! tests and development, and [sqlite] for production.

mod account;
mod category;
mod transaction;

pub mod memory;
pub mod sqlite;

pub use account::AccountStore;
pub use category::CategoryStore;
pub use transaction::TransactionStore;
