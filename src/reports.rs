//! Grouped rollups over enriched transactions.
//!
//! All summation happens on [Decimal] values so repeated aggregation never
//! accumulates binary floating-point rounding error. Both storage backends
//! delegate to these functions, so the two produce identical reports for
//! identical data.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::EnrichedTransaction;

/// One row of a grouped rollup: a distinct group key, the decimal-exact sum
/// of amounts, and the number of transactions in the group.
///
/// Keys with zero transactions are absent rather than zero-valued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupRow {
    /// The value the group shares: a category tag, a month label, or an
    /// account name.
    pub key: String,
    /// The sum of amounts in the group, to two decimal places.
    pub total: Decimal,
    /// The number of transactions in the group.
    pub count: u64,
}

/// Group `transactions` by the mid-level category tag
/// ([category](crate::models::ExpenseCategory::category), not the expense
/// name). Rows are ordered alphabetically by tag.
pub fn category_rollup(transactions: &[EnrichedTransaction]) -> Vec<RollupRow> {
    rollup_by(transactions, |row| row.expense_category.category.clone())
}

/// Group `transactions` by account name. Rows are ordered alphabetically by
/// name.
pub fn bank_rollup(transactions: &[EnrichedTransaction]) -> Vec<RollupRow> {
    rollup_by(transactions, |row| row.bank_account.account_name.clone())
}

/// Group `transactions` by the calendar month of their transaction date.
///
/// Keys render as a short month name plus year, e.g. "Jan 2024". Rows are
/// ordered chronologically by the underlying month, not by the label, so
/// consumers can take a trailing slice to get the most recent months.
pub fn monthly_rollup(transactions: &[EnrichedTransaction]) -> Vec<RollupRow> {
    let mut groups: BTreeMap<(i32, u8), (Decimal, u64)> = BTreeMap::new();

    for row in transactions {
        let date = row.transaction.transaction_date;
        let entry = groups
            .entry((date.year(), date.month() as u8))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += row.transaction.amount;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((year, month), (total, count))| RollupRow {
            key: format!("{} {year}", month_short_name(month)),
            total,
            count,
        })
        .collect()
}

fn rollup_by(
    transactions: &[EnrichedTransaction],
    key_of: impl Fn(&EnrichedTransaction) -> String,
) -> Vec<RollupRow> {
    let mut groups: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();

    for row in transactions {
        let entry = groups.entry(key_of(row)).or_insert((Decimal::ZERO, 0));
        entry.0 += row.transaction.amount;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (total, count))| RollupRow { key, total, count })
        .collect()
}

fn month_short_name(month: u8) -> &'static str {
    // `month` comes from `Date::month`, so it is always in 1..=12.
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => unreachable!("month {month} is not a calendar month"),
    }
}
