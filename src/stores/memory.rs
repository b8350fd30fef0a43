//! Implements in-memory backed stores for tests and development.
//!
//! All three stores share one set of tables behind an `Arc<Mutex<..>>`, the
//! same shape the SQLite stores share a connection, so the cross-entity join
//! for enriched transactions works inside a single lock hold. Each test can
//! build its own state with [create_memory_state]; there is no process-wide
//! shared store.

use std::{
    collections::HashMap,
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use time::Date;

use crate::{
    AppState, Error,
    models::{
        Account, AccountPatch, CategoryPatch, EnrichedTransaction, EntityId, ExpenseCategory,
        NewAccount, NewExpenseCategory, NewTransaction, Transaction, TransactionPatch,
    },
    stores::{AccountStore, CategoryStore, TransactionStore},
};

/// The entity tables shared by the in-memory stores.
#[derive(Debug, Default)]
pub struct MemoryTables {
    accounts: HashMap<EntityId, Account>,
    categories: HashMap<EntityId, ExpenseCategory>,
    transactions: HashMap<EntityId, Transaction>,
}

impl MemoryTables {
    /// Join a transaction with its account and category, or `None` if either
    /// reference dangles.
    fn enrich(&self, transaction: &Transaction) -> Option<EnrichedTransaction> {
        let bank_account = self.accounts.get(&transaction.bank_account_id)?.clone();
        let expense_category = self
            .categories
            .get(&transaction.expense_category_id)?
            .clone();

        Some(EnrichedTransaction {
            transaction: transaction.clone(),
            bank_account,
            expense_category,
        })
    }

    /// All fully joinable transactions, descending by date with the ID as a
    /// stable tiebreak. This is the single source of ordering and visibility
    /// for every transaction read.
    fn enriched_descending(&self) -> Vec<EnrichedTransaction> {
        let mut rows: Vec<EnrichedTransaction> = self
            .transactions
            .values()
            .filter_map(|transaction| self.enrich(transaction))
            .collect();

        rows.sort_by(|a, b| {
            b.transaction
                .transaction_date
                .cmp(&a.transaction.transaction_date)
                .then_with(|| b.transaction.id.cmp(&a.transaction.id))
        });

        rows
    }
}

/// An alias for an [AppState] that keeps all data in memory.
pub type MemoryAppState =
    AppState<MemoryAccountStore, MemoryCategoryStore, MemoryTransactionStore>;

/// Creates an [AppState] instance backed by a fresh, empty set of in-memory
/// tables.
pub fn create_memory_state() -> MemoryAppState {
    let tables = Arc::new(Mutex::new(MemoryTables::default()));

    AppState::new(
        MemoryAccountStore {
            tables: tables.clone(),
        },
        MemoryCategoryStore {
            tables: tables.clone(),
        },
        MemoryTransactionStore { tables },
    )
}

/// Stores accounts in memory.
#[derive(Debug, Clone)]
pub struct MemoryAccountStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl AccountStore for MemoryAccountStore {
    fn list(&self) -> Result<Vec<Account>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.accounts.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Account>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.accounts.get(id).cloned())
    }

    fn create(&mut self, new_account: NewAccount) -> Result<Account, Error> {
        let account = Account::new(new_account)?;

        let mut tables = self.tables.lock().unwrap();
        tables.accounts.insert(account.id.clone(), account.clone());

        Ok(account)
    }

    fn update(&mut self, id: &str, patch: AccountPatch) -> Result<Option<Account>, Error> {
        let mut tables = self.tables.lock().unwrap();

        let Some(existing) = tables.accounts.get(id) else {
            return Ok(None);
        };

        let updated = existing.apply(patch)?;
        tables.accounts.insert(updated.id.clone(), updated.clone());

        Ok(Some(updated))
    }

    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let mut tables = self.tables.lock().unwrap();

        Ok(tables.accounts.remove(id).is_some())
    }
}

/// Stores expense categories in memory.
#[derive(Debug, Clone)]
pub struct MemoryCategoryStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl CategoryStore for MemoryCategoryStore {
    fn list(&self) -> Result<Vec<ExpenseCategory>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.categories.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<ExpenseCategory>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.categories.get(id).cloned())
    }

    fn create(&mut self, new_category: NewExpenseCategory) -> Result<ExpenseCategory, Error> {
        let category = ExpenseCategory::new(new_category)?;

        let mut tables = self.tables.lock().unwrap();
        tables
            .categories
            .insert(category.id.clone(), category.clone());

        Ok(category)
    }

    fn update(
        &mut self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<ExpenseCategory>, Error> {
        let mut tables = self.tables.lock().unwrap();

        let Some(existing) = tables.categories.get(id) else {
            return Ok(None);
        };

        let updated = existing.apply(patch)?;
        tables
            .categories
            .insert(updated.id.clone(), updated.clone());

        Ok(Some(updated))
    }

    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let mut tables = self.tables.lock().unwrap();

        Ok(tables.categories.remove(id).is_some())
    }
}

/// Stores transactions in memory.
#[derive(Debug, Clone)]
pub struct MemoryTransactionStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl TransactionStore for MemoryTransactionStore {
    fn list(&self) -> Result<Vec<EnrichedTransaction>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.enriched_descending())
    }

    fn get(&self, id: &str) -> Result<Option<EnrichedTransaction>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables
            .transactions
            .get(id)
            .and_then(|transaction| tables.enrich(transaction)))
    }

    fn create(&mut self, new_transaction: NewTransaction) -> Result<EnrichedTransaction, Error> {
        let transaction = Transaction::new(new_transaction)?;

        let mut tables = self.tables.lock().unwrap();

        if !tables.accounts.contains_key(&transaction.bank_account_id) {
            return Err(Error::InvalidAccount);
        }

        if !tables
            .categories
            .contains_key(&transaction.expense_category_id)
        {
            return Err(Error::InvalidCategory);
        }

        tables
            .transactions
            .insert(transaction.id.clone(), transaction.clone());

        // Both references were just checked, so the join cannot fail.
        Ok(tables.enrich(&transaction).unwrap())
    }

    fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<EnrichedTransaction>, Error> {
        let mut tables = self.tables.lock().unwrap();

        let existing = match tables.transactions.get(id) {
            Some(transaction) if tables.enrich(transaction).is_some() => transaction,
            // Missing and dangling transactions look the same to callers.
            _ => return Ok(None),
        };

        let updated = existing.apply(patch)?;

        if !tables.accounts.contains_key(&updated.bank_account_id) {
            return Err(Error::InvalidAccount);
        }

        if !tables.categories.contains_key(&updated.expense_category_id) {
            return Err(Error::InvalidCategory);
        }

        tables
            .transactions
            .insert(updated.id.clone(), updated.clone());

        Ok(tables.enrich(&updated))
    }

    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let mut tables = self.tables.lock().unwrap();

        Ok(tables.transactions.remove(id).is_some())
    }

    fn filter_by_date_range(
        &self,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<EnrichedTransaction>, Error> {
        let tables = self.tables.lock().unwrap();

        Ok(tables
            .enriched_descending()
            .into_iter()
            .filter(|row| date_range.contains(&row.transaction.transaction_date))
            .collect())
    }
}

#[cfg(test)]
mod memory_store_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use super::{MemoryAppState, create_memory_state};
    use crate::{
        Error,
        models::{
            Account, AccountPatch, ExpenseCategory, NewAccount, NewExpenseCategory,
            NewTransaction, TransactionPatch,
        },
        stores::{AccountStore, CategoryStore, TransactionStore},
    };

    fn create_account_and_category(state: &mut MemoryAppState) -> (Account, ExpenseCategory) {
        let account = state
            .account_store
            .create(NewAccount {
                account_name: "HDFC".to_string(),
                group: "savings".to_string(),
                description: None,
            })
            .unwrap();

        let category = state
            .category_store
            .create(NewExpenseCategory {
                name: "Groceries".to_string(),
                group: "necessity".to_string(),
                category: "food".to_string(),
            })
            .unwrap();

        (account, category)
    }

    fn new_transaction(account: &Account, category: &ExpenseCategory, date: &str) -> NewTransaction {
        NewTransaction {
            bank_account_id: account.id.clone(),
            expense_category_id: category.id.clone(),
            description: None,
            amount: Decimal::from_str("150.50").unwrap(),
            transaction_date: date.to_string(),
        }
    }

    #[test]
    fn create_then_get_returns_equal_account() {
        let mut state = create_memory_state();

        let account = state
            .account_store
            .create(NewAccount {
                account_name: "HDFC".to_string(),
                group: "savings".to_string(),
                description: Some("daily driver".to_string()),
            })
            .unwrap();

        let got = state.account_store.get(&account.id).unwrap();

        assert_eq!(got, Some(account));
    }

    #[test]
    fn get_missing_account_is_none() {
        let state = create_memory_state();

        assert_eq!(state.account_store.get("no-such-id"), Ok(None));
    }

    #[test]
    fn update_missing_account_is_none() {
        let mut state = create_memory_state();

        let result = state
            .account_store
            .update("no-such-id", AccountPatch::default());

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn delete_account_twice_reports_noop_second_time() {
        let mut state = create_memory_state();
        let (account, _) = create_account_and_category(&mut state);

        assert_eq!(state.account_store.delete(&account.id), Ok(true));
        assert_eq!(state.account_store.delete(&account.id), Ok(false));
        assert_eq!(state.account_store.get(&account.id), Ok(None));
    }

    #[test]
    fn create_transaction_then_get_returns_enriched() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let created = state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let got = state.transaction_store.get(&created.transaction.id).unwrap();

        assert_eq!(got, Some(created.clone()));
        assert_eq!(created.bank_account, account);
        assert_eq!(created.expense_category, category);
        assert_eq!(created.transaction.transaction_date, date!(2024 - 01 - 15));
    }

    #[test]
    fn create_transaction_fails_on_unknown_account() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let mut payload = new_transaction(&account, &category, "2024-01-15");
        payload.bank_account_id = "no-such-account".to_string();

        let result = state.transaction_store.create(payload);

        assert_eq!(result, Err(Error::InvalidAccount));
    }

    #[test]
    fn create_transaction_fails_on_unknown_category() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let mut payload = new_transaction(&account, &category, "2024-01-15");
        payload.expense_category_id = "no-such-category".to_string();

        let result = state.transaction_store.create(payload);

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[test]
    fn list_orders_transactions_most_recent_first() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        for date in ["2024-01-10", "2024-03-05", "2024-02-20"] {
            state
                .transaction_store
                .create(new_transaction(&account, &category, date))
                .unwrap();
        }

        let dates: Vec<String> = state
            .transaction_store
            .list()
            .unwrap()
            .iter()
            .map(|row| row.transaction.transaction_date.to_string())
            .collect();

        assert_eq!(dates, vec!["2024-03-05", "2024-02-20", "2024-01-10"]);
    }

    #[test]
    fn deleting_account_hides_its_transactions() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let created = state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        assert!(state.account_store.delete(&account.id).unwrap());

        assert_eq!(state.transaction_store.list(), Ok(vec![]));
        assert_eq!(
            state.transaction_store.get(&created.transaction.id),
            Ok(None)
        );
    }

    #[test]
    fn deleting_category_hides_its_transactions() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        assert!(state.category_store.delete(&category.id).unwrap());

        assert_eq!(state.transaction_store.list(), Ok(vec![]));
    }

    #[test]
    fn update_dangling_transaction_is_none() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let created = state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        state.account_store.delete(&account.id).unwrap();

        let result = state
            .transaction_store
            .update(&created.transaction.id, TransactionPatch::default());

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn update_transaction_merges_supplied_fields() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let created = state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let updated = state
            .transaction_store
            .update(
                &created.transaction.id,
                TransactionPatch {
                    amount: Some(Decimal::from_str("42.00").unwrap()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.transaction.amount.to_string(), "42.00");
        assert_eq!(
            updated.transaction.transaction_date,
            created.transaction.transaction_date
        );
        assert_eq!(updated.transaction.id, created.transaction.id);
    }

    #[test]
    fn update_transaction_rejects_unknown_account_reference() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        let created = state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let result = state.transaction_store.update(
            &created.transaction.id,
            TransactionPatch {
                bank_account_id: Some("no-such-account".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::InvalidAccount));
    }

    #[test]
    fn filter_includes_both_boundaries() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        for date in ["2024-01-01", "2024-01-15", "2024-01-31", "2024-02-01"] {
            state
                .transaction_store
                .create(new_transaction(&account, &category, date))
                .unwrap();
        }

        let got = state
            .transaction_store
            .filter_by_date_range(date!(2024 - 01 - 01)..=date!(2024 - 01 - 31))
            .unwrap();

        let dates: Vec<String> = got
            .iter()
            .map(|row| row.transaction.transaction_date.to_string())
            .collect();

        assert_eq!(dates, vec!["2024-01-31", "2024-01-15", "2024-01-01"]);
    }

    #[test]
    fn filter_on_single_day_includes_that_day() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let got = state
            .transaction_store
            .filter_by_date_range(date!(2024 - 01 - 15)..=date!(2024 - 01 - 15))
            .unwrap();

        assert_eq!(got.len(), 1);
    }

    #[test]
    fn inverted_filter_range_is_empty() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let got = state
            .transaction_store
            .filter_by_date_range(date!(2024 - 02 - 01)..=date!(2024 - 01 - 01))
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn rollups_agree_with_raw_sum() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        for (amount, date) in [("100.00", "2024-01-10"), ("200.00", "2024-02-15")] {
            let mut payload = new_transaction(&account, &category, date);
            payload.amount = Decimal::from_str(amount).unwrap();
            state.transaction_store.create(payload).unwrap();
        }

        let want: Decimal = state
            .transaction_store
            .list()
            .unwrap()
            .iter()
            .map(|row| row.transaction.amount)
            .sum();
        assert_eq!(want, Decimal::from_str("300.00").unwrap());

        for rollup in [
            state.transaction_store.category_rollup().unwrap(),
            state.transaction_store.monthly_rollup().unwrap(),
            state.transaction_store.bank_rollup().unwrap(),
        ] {
            let got: Decimal = rollup.iter().map(|row| row.total).sum();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn category_rollup_scenario() {
        let mut state = create_memory_state();
        let (account, category) = create_account_and_category(&mut state);

        state
            .transaction_store
            .create(new_transaction(&account, &category, "2024-01-15"))
            .unwrap();

        let rollup = state.transaction_store.category_rollup().unwrap();

        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].key, "food");
        assert_eq!(rollup[0].total, Decimal::from_str("150.50").unwrap());
        assert_eq!(rollup[0].count, 1);
    }
}
