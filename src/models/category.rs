//! Defines the expense category model and its create/update payloads.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, models::EntityId};

/// A label describing what a transaction was spent on.
///
/// The three text fields are independent, user-supplied classification axes:
/// `name` is the specific expense ("Groceries"), `category` a mid-level tag
/// ("food"), and `group` a broad tag ("necessity"). None of them are
/// enumerated at this layer; validating against a fixed list is a
/// presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// The unique ID for the category.
    pub id: EntityId,
    /// The specific expense label, e.g. "Groceries".
    pub name: String,
    /// A broad tag, e.g. "necessity" or "lifestyle".
    pub group: String,
    /// A mid-level tag, e.g. "food" or "transport".
    pub category: String,
    /// When the category record was created.
    pub created_at: OffsetDateTime,
}

/// The fields needed to create a new [ExpenseCategory].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewExpenseCategory {
    /// The specific expense label.
    pub name: String,
    /// A broad tag.
    pub group: String,
    /// A mid-level tag.
    pub category: String,
}

/// A partial update to an [ExpenseCategory]. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryPatch {
    /// The new expense label, if it should change.
    pub name: Option<String>,
    /// The new broad tag, if it should change.
    pub group: Option<String>,
    /// The new mid-level tag, if it should change.
    pub category: Option<String>,
}

impl ExpenseCategory {
    /// Create a category from `new_category`, assigning a fresh ID and
    /// setting the creation time to now.
    ///
    /// # Errors
    /// Returns [Error::EmptyExpenseName], [Error::EmptyGroup], or
    /// [Error::EmptyCategory] if a required field is blank.
    pub fn new(new_category: NewExpenseCategory) -> Result<Self, Error> {
        validate(&new_category.name, &new_category.group, &new_category.category)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: new_category.name,
            group: new_category.group,
            category: new_category.category,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Merge `patch` into this category, leaving unsupplied fields untouched.
    ///
    /// The ID and creation time are never overwritten.
    ///
    /// # Errors
    /// Returns [Error::EmptyExpenseName], [Error::EmptyGroup], or
    /// [Error::EmptyCategory] if a supplied field is blank.
    pub fn apply(&self, patch: CategoryPatch) -> Result<Self, Error> {
        let name = patch.name.unwrap_or_else(|| self.name.clone());
        let group = patch.group.unwrap_or_else(|| self.group.clone());
        let category = patch.category.unwrap_or_else(|| self.category.clone());

        validate(&name, &group, &category)?;

        Ok(Self {
            id: self.id.clone(),
            name,
            group,
            category,
            created_at: self.created_at,
        })
    }
}

fn validate(name: &str, group: &str, category: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::EmptyExpenseName);
    }

    if group.trim().is_empty() {
        return Err(Error::EmptyGroup);
    }

    if category.trim().is_empty() {
        return Err(Error::EmptyCategory);
    }

    Ok(())
}
