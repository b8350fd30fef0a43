//! Defines the bank account model and its create/update payloads.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, models::EntityId};

/// A bank, cash, or credit account that transactions are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The unique ID for the account.
    pub id: EntityId,
    /// The display name of the account, e.g. "HDFC".
    pub account_name: String,
    /// A free-text tag grouping similar accounts, e.g. "savings" or "cash".
    pub group: String,
    /// An optional note describing the account.
    pub description: Option<String>,
    /// When the account record was created.
    pub created_at: OffsetDateTime,
}

/// The fields needed to create a new [Account].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAccount {
    /// The display name of the account.
    pub account_name: String,
    /// A free-text tag grouping similar accounts.
    pub group: String,
    /// An optional note describing the account.
    pub description: Option<String>,
}

/// A partial update to an [Account]. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountPatch {
    /// The new display name, if it should change.
    pub account_name: Option<String>,
    /// The new group tag, if it should change.
    pub group: Option<String>,
    /// The new description, if it should change.
    pub description: Option<String>,
}

impl Account {
    /// Create an account from `new_account`, assigning a fresh ID and setting
    /// the creation time to now.
    ///
    /// # Errors
    /// Returns [Error::EmptyAccountName] or [Error::EmptyGroup] if either
    /// required field is blank.
    pub fn new(new_account: NewAccount) -> Result<Self, Error> {
        if new_account.account_name.trim().is_empty() {
            return Err(Error::EmptyAccountName);
        }

        if new_account.group.trim().is_empty() {
            return Err(Error::EmptyGroup);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            account_name: new_account.account_name,
            group: new_account.group,
            description: new_account.description,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Merge `patch` into this account, leaving unsupplied fields untouched.
    ///
    /// The ID and creation time are never overwritten.
    ///
    /// # Errors
    /// Returns [Error::EmptyAccountName] or [Error::EmptyGroup] if a supplied
    /// field is blank.
    pub fn apply(&self, patch: AccountPatch) -> Result<Self, Error> {
        let account_name = patch.account_name.unwrap_or_else(|| self.account_name.clone());
        let group = patch.group.unwrap_or_else(|| self.group.clone());

        if account_name.trim().is_empty() {
            return Err(Error::EmptyAccountName);
        }

        if group.trim().is_empty() {
            return Err(Error::EmptyGroup);
        }

        Ok(Self {
            id: self.id.clone(),
            account_name,
            group,
            description: patch.description.or_else(|| self.description.clone()),
            created_at: self.created_at,
        })
    }
}
