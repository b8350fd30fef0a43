//! Defines the transaction model, the enriched read shape, and the
//! create/update payloads with their validation rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use uuid::Uuid;

use crate::{
    Error,
    models::{Account, EntityId, ExpenseCategory},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// An expense: money spent from a bank account on an expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID for the transaction.
    pub id: EntityId,
    /// The ID of the [Account] the money was drawn from.
    pub bank_account_id: EntityId,
    /// The ID of the [ExpenseCategory] describing the expense.
    pub expense_category_id: EntityId,
    /// An optional note describing the expense.
    pub description: Option<String>,
    /// The amount spent. Always strictly positive with exactly two decimal
    /// places.
    pub amount: Decimal,
    /// The calendar day the expense happened on, as supplied by the user.
    pub transaction_date: Date,
    /// When the transaction record was created.
    pub created_at: OffsetDateTime,
}

/// A [Transaction] with its account and expense category resolved inline.
///
/// This shape is never stored; it is computed by a join on every read. Reads
/// only ever return transactions where both references resolve, so both
/// fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    /// The stored transaction.
    pub transaction: Transaction,
    /// The account the transaction draws from.
    pub bank_account: Account,
    /// The expense category the transaction is labelled with.
    pub expense_category: ExpenseCategory,
}

/// The fields needed to create a new [Transaction].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// The ID of the account the money was drawn from.
    pub bank_account_id: EntityId,
    /// The ID of the expense category describing the expense.
    pub expense_category_id: EntityId,
    /// An optional note describing the expense.
    pub description: Option<String>,
    /// The amount spent. Must be strictly positive.
    pub amount: Decimal,
    /// The day the expense happened, as an ISO-8601 date or date-time string.
    pub transaction_date: String,
}

/// A partial update to a [Transaction]. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionPatch {
    /// The new account ID, if it should change.
    pub bank_account_id: Option<EntityId>,
    /// The new expense category ID, if it should change.
    pub expense_category_id: Option<EntityId>,
    /// The new description, if it should change.
    pub description: Option<String>,
    /// The new amount, if it should change. Must be strictly positive.
    pub amount: Option<Decimal>,
    /// The new transaction date, if it should change.
    pub transaction_date: Option<String>,
}

/// Parse a user-supplied date string as a calendar date.
///
/// Accepts an ISO-8601 calendar date (`2024-01-15`), a date-time
/// (`2024-01-15T09:30:00`), or an RFC 3339 date-time with an offset
/// (`2024-01-15T09:30:00Z`); the time of day and offset, if present, are
/// discarded so that range filtering and monthly grouping operate on whole
/// days.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` matches none of the formats.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    if let Ok(date) = Date::parse(text, &DATE_FORMAT) {
        return Ok(date);
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(text, &DATE_TIME_FORMAT) {
        return Ok(date_time.date());
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|date_time| date_time.date())
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Check that `amount` is strictly positive and normalise it to exactly two
/// decimal places.
fn validate_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(amount));
    }

    let mut amount = amount.round_dp(2);
    amount.rescale(2);

    Ok(amount)
}

impl Transaction {
    /// Create a transaction from `new_transaction`, assigning a fresh ID and
    /// setting the creation time to now.
    ///
    /// Whether the referenced account and category exist is checked by the
    /// store, not here.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is zero or negative,
    /// or [Error::InvalidDate] if the transaction date cannot be parsed.
    pub fn new(new_transaction: NewTransaction) -> Result<Self, Error> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            bank_account_id: new_transaction.bank_account_id,
            expense_category_id: new_transaction.expense_category_id,
            description: new_transaction.description,
            amount: validate_amount(new_transaction.amount)?,
            transaction_date: parse_date(&new_transaction.transaction_date)?,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Merge `patch` into this transaction, leaving unsupplied fields
    /// untouched. The ID and creation time are never overwritten.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] or [Error::InvalidDate] if a
    /// supplied field fails validation.
    pub fn apply(&self, patch: TransactionPatch) -> Result<Self, Error> {
        let amount = match patch.amount {
            Some(amount) => validate_amount(amount)?,
            None => self.amount,
        };

        let transaction_date = match patch.transaction_date {
            Some(ref text) => parse_date(text)?,
            None => self.transaction_date,
        };

        Ok(Self {
            id: self.id.clone(),
            bank_account_id: patch
                .bank_account_id
                .unwrap_or_else(|| self.bank_account_id.clone()),
            expense_category_id: patch
                .expense_category_id
                .unwrap_or_else(|| self.expense_category_id.clone()),
            description: patch.description.or_else(|| self.description.clone()),
            amount,
            transaction_date,
            created_at: self.created_at,
        })
    }
}
