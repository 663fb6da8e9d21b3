//! Transactions as the upstream API stores them.
//!
//! This module contains everything related to transactions:
//! - Coercion of loosely typed upstream fields into amounts and dates
//! - The raw and normalized `Transaction` models
//! - Validation of new transactions submitted by the client
//! - Route handlers for listing, creating and deleting transactions

mod coercion;
mod form;
mod handlers;
mod models;

pub use coercion::{is_same_month, month_key, parse_date, to_amount};
pub use form::{NewTransaction, TransactionForm};
pub use handlers::{TransactionState, create_transaction, delete_transaction, get_transactions};
pub use models::{
    RawTransaction, RecordId, Transaction, TransactionType, UNTAGGED_LABEL, normalize,
    normalize_all,
};
