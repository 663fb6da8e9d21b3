//! The "recent transactions" list.

use serde::Serialize;

use crate::transaction::{RecordId, Transaction, TransactionType};

/// A transaction shaped for the recent transactions list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRow {
    /// The upstream ID.
    pub id: Option<RecordId>,
    /// The date as sent upstream.
    pub date: String,
    /// The time of day, if recorded.
    pub time: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The resolved tag or category.
    pub category: String,
    /// The resolved amount.
    pub amount: f64,
    /// Free text.
    pub note: Option<String>,
}

impl From<&Transaction> for RecentRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            date: transaction.date.clone(),
            time: transaction.time.clone(),
            kind: transaction.kind,
            category: transaction.category.clone(),
            amount: transaction.amount,
            note: transaction.note.clone(),
        }
    }
}

/// Lists every transaction newest first.
///
/// Transactions are ordered by comparing "{date} {time}" as strings, so this
/// relies on dates and times being zero-padded. Equal keys keep their input
/// order. The list is not truncated, callers take as many rows as they need.
pub fn build_recent(transactions: &[Transaction]) -> Vec<RecentRow> {
    let mut keyed: Vec<(String, RecentRow)> = transactions
        .iter()
        .map(|transaction| (transaction.recency_key(), RecentRow::from(transaction)))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));

    keyed.into_iter().map(|(_, row)| row).collect()
}
