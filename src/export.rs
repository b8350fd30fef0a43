//! Serializes transactions to CSV for download or archival.

use crate::{Error, models::EnrichedTransaction};

const HEADER: [&str; 7] = [
    "Date",
    "Bank Account",
    "Expense Name",
    "Category",
    "Group",
    "Description",
    "Amount",
];

/// Render `transactions` as CSV text, one row per transaction in the order
/// given.
///
/// Dates are formatted as `YYYY-MM-DD` and amounts with exactly two decimal
/// places, no currency symbol or thousands separator. Any field containing a
/// comma, quote, or newline is quoted per RFC 4180, so embedded commas in
/// descriptions or account names never split columns.
///
/// # Errors
/// Returns an [Error::Csv] if a record cannot be written.
pub fn export_csv(transactions: &[EnrichedTransaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(HEADER)?;

    for row in transactions {
        writer.write_record([
            row.transaction.transaction_date.to_string(),
            row.bank_account.account_name.clone(),
            row.expense_category.name.clone(),
            row.expense_category.category.clone(),
            row.expense_category.group.clone(),
            row.transaction.description.clone().unwrap_or_default(),
            row.transaction.amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::Csv(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::Csv(error.to_string()))
}
