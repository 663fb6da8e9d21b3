//! Raw upstream records and the canonical transaction derived from them.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::transaction::coercion::{date_in_month, parse_date, to_amount};

/// The label used for transactions without a tag or category.
pub const UNTAGGED_LABEL: &str = "Other";

/// The ID of a record in the upstream API, which may be a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// A numeric ID.
    Number(i64),
    /// A string ID, e.g. a UUID.
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// Parses "income" or "expense", ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.eq_ignore_ascii_case("income") {
            Some(TransactionType::Income)
        } else if text.eq_ignore_ascii_case("expense") {
            Some(TransactionType::Expense)
        } else {
            None
        }
    }
}

/// A transaction exactly as the upstream API sends it.
///
/// Every field is optional and loosely typed: the amount may live under
/// `value` or `amount`, the label under `tag` or `category`, and numbers may
/// arrive as strings. Use [normalize] to get a [Transaction].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTransaction {
    /// The upstream ID.
    #[serde(default)]
    pub id: Option<RecordId>,
    /// The date, normally "YYYY-MM-DD".
    #[serde(default)]
    pub date: Option<Value>,
    /// The time of day, e.g. "14:05".
    #[serde(default)]
    pub time: Option<Value>,
    /// "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    /// The tag name, or a tag object with a `name`.
    #[serde(default)]
    pub tag: Option<Value>,
    /// Older records carry the label here instead of in `tag`.
    #[serde(default)]
    pub category: Option<Value>,
    /// The amount.
    #[serde(default)]
    pub value: Option<Value>,
    /// The amount, for records that do not use `value`.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Free text.
    #[serde(default)]
    pub note: Option<Value>,
}

/// A transaction with every field resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The upstream ID, if the record had one.
    pub id: Option<RecordId>,
    /// The date string as sent upstream.
    pub date: String,
    /// `date` parsed as a calendar date, `None` if it could not be parsed.
    #[serde(skip)]
    pub parsed_date: Option<Date>,
    /// The time of day, if recorded.
    pub time: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The tag or category label, never empty.
    pub category: String,
    /// Always finite and non-negative, the sign comes from `kind`.
    pub amount: f64,
    /// Free text, not used in reports.
    pub note: Option<String>,
}

impl Transaction {
    /// Whether the transaction's date falls in `month` (1-12) of `year`.
    pub fn is_in_month(&self, year: i32, month: u8) -> bool {
        self.parsed_date
            .is_some_and(|date| date_in_month(date, year, month))
    }

    /// The string "{date} {time}" used to order transactions by recency.
    ///
    /// A missing time is treated as an empty string, so untimed transactions
    /// sort after timed ones on the same day when sorting newest first.
    pub fn recency_key(&self) -> String {
        format!("{} {}", self.date, self.time.as_deref().unwrap_or(""))
    }
}

fn text(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(text)) => Some(text.as_str()),
        _ => None,
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    text(value).filter(|text| !text.trim().is_empty())
}

/// Reads a tag or category label, which may also be an object with a name.
fn label(value: Option<&Value>) -> Option<&str> {
    let label = match value {
        Some(Value::Object(object)) => non_blank(object.get("name")),
        value => non_blank(value),
    };

    label.map(str::trim)
}

/// Converts a raw upstream record into a [Transaction].
///
/// - the label is taken from `tag`, then `category`, then [UNTAGGED_LABEL];
/// - the amount is taken from `value`, then `amount`, then zero, and any sign
///   is dropped;
/// - an unparseable date is kept as text but left out of month buckets.
///
/// Returns `None` if the type is neither income nor expense.
pub fn normalize(raw: RawTransaction) -> Option<Transaction> {
    let Some(kind) = text(raw.kind.as_ref()).and_then(TransactionType::parse) else {
        tracing::warn!(
            "skipping transaction {:?} with unknown type {:?}",
            raw.id,
            raw.kind
        );
        return None;
    };

    let date = text(raw.date.as_ref()).unwrap_or_default().to_owned();
    let parsed_date = parse_date(&date);
    if parsed_date.is_none() {
        tracing::debug!("transaction {:?} has an invalid date {date:?}", raw.id);
    }

    let category = label(raw.tag.as_ref())
        .or_else(|| label(raw.category.as_ref()))
        .unwrap_or(UNTAGGED_LABEL)
        .to_owned();

    let amount = raw
        .value
        .as_ref()
        .or(raw.amount.as_ref())
        .map(to_amount)
        .unwrap_or(0.0)
        .abs();

    Some(Transaction {
        id: raw.id,
        date,
        parsed_date,
        time: non_blank(raw.time.as_ref()).map(str::to_owned),
        kind,
        category,
        amount,
        note: non_blank(raw.note.as_ref()).map(str::to_owned),
    })
}

/// Normalizes a snapshot of raw records, dropping those [normalize] rejects.
pub fn normalize_all(raw: Vec<RawTransaction>) -> Vec<Transaction> {
    raw.into_iter().filter_map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::macros::date;

    use super::{
        RawTransaction, RecordId, TransactionType, UNTAGGED_LABEL, normalize, normalize_all,
    };

    fn raw(value: Value) -> RawTransaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_a_complete_record() {
        let transaction = normalize(raw(json!({
            "id": 7,
            "date": "2025-01-05",
            "time": "09:30",
            "type": "income",
            "tag": "Salary",
            "amount": 1000,
            "note": "January pay"
        })))
        .unwrap();

        assert_eq!(transaction.id, Some(RecordId::Number(7)));
        assert_eq!(transaction.date, "2025-01-05");
        assert_eq!(transaction.parsed_date, Some(date!(2025 - 01 - 05)));
        assert_eq!(transaction.time.as_deref(), Some("09:30"));
        assert_eq!(transaction.kind, TransactionType::Income);
        assert_eq!(transaction.category, "Salary");
        assert_eq!(transaction.amount, 1000.0);
        assert_eq!(transaction.note.as_deref(), Some("January pay"));
    }

    #[test]
    fn prefers_value_over_amount_and_tag_over_category() {
        let transaction = normalize(raw(json!({
            "date": "2025-01-05",
            "type": "expense",
            "value": "12.5",
            "amount": 99,
            "tag": "Food",
            "category": "Groceries"
        })))
        .unwrap();

        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.category, "Food");
    }

    #[test]
    fn falls_back_to_category_then_other() {
        let with_category = normalize(raw(json!({
            "date": "2025-01-05",
            "type": "expense",
            "tag": "  ",
            "category": "Groceries"
        })))
        .unwrap();
        let with_nothing = normalize(raw(json!({"date": "2025-01-05", "type": "expense"}))).unwrap();

        assert_eq!(with_category.category, "Groceries");
        assert_eq!(with_nothing.category, UNTAGGED_LABEL);
        assert_eq!(with_nothing.amount, 0.0);
    }

    #[test]
    fn reads_tag_objects_by_name() {
        let transaction = normalize(raw(json!({
            "date": "2025-01-05",
            "type": "expense",
            "tag": {"id": 3, "name": "Transport"}
        })))
        .unwrap();

        assert_eq!(transaction.category, "Transport");
    }

    #[test]
    fn drops_the_sign_of_stored_amounts() {
        let transaction = normalize(raw(json!({
            "date": "2025-01-05",
            "type": "expense",
            "amount": -300
        })))
        .unwrap();

        assert_eq!(transaction.amount, 300.0);
    }

    #[test]
    fn keeps_records_with_invalid_dates() {
        let transaction = normalize(raw(json!({"date": "soon", "type": "income", "amount": 5})))
            .unwrap();

        assert_eq!(transaction.date, "soon");
        assert_eq!(transaction.parsed_date, None);
        assert!(!transaction.is_in_month(2025, 1));
    }

    #[test]
    fn rejects_unknown_types() {
        assert_eq!(normalize(raw(json!({"date": "2025-01-05", "type": "transfer"}))), None);
        assert_eq!(normalize(raw(json!({"date": "2025-01-05"}))), None);
    }

    #[test]
    fn type_is_case_insensitive() {
        assert_eq!(TransactionType::parse(" Income "), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("EXPENSE"), Some(TransactionType::Expense));
    }

    #[test]
    fn normalize_all_skips_rejected_records() {
        let transactions = normalize_all(vec![
            raw(json!({"date": "2025-01-05", "type": "income", "amount": 1})),
            raw(json!({"date": "2025-01-05", "type": "refund", "amount": 2})),
            raw(json!({"id": "b", "date": "2025-01-06", "type": "expense", "amount": 3})),
        ]);

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].id, Some(RecordId::Text("b".to_owned())));
    }

    #[test]
    fn recency_key_uses_an_empty_time_when_missing() {
        let timed = normalize(raw(json!({"date": "2025-01-05", "time": "08:00", "type": "income"})))
            .unwrap();
        let untimed = normalize(raw(json!({"date": "2025-01-05", "type": "income"}))).unwrap();

        assert_eq!(timed.recency_key(), "2025-01-05 08:00");
        assert_eq!(untimed.recency_key(), "2025-01-05 ");
    }
}
