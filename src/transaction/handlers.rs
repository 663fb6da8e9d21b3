//! Route handlers for listing, creating and deleting transactions.

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    session::Session,
    timezone::local_today,
    transaction::{
        NewTransaction, RawTransaction, RecordId, Transaction, TransactionForm, UNTAGGED_LABEL,
        normalize, normalize_all, parse_date,
    },
    upstream::UpstreamClient,
};

/// The state needed to get, create or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The client for the upstream API that stores transactions.
    pub upstream: UpstreamClient,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for listing the user's transactions with every field resolved.
pub async fn get_transactions(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Json<Vec<Transaction>>, Error> {
    let raw = state
        .upstream
        .transactions(session.token())
        .await
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(normalize_all(raw)))
}

/// A route handler for creating a new transaction, responds with the created
/// transaction and `201 Created` on success.
pub async fn create_transaction(
    State(state): State<TransactionState>,
    session: Session,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = form.map_err(|rejection| {
        tracing::debug!("rejected transaction body: {rejection}");
        Error::InvalidTransaction(rejection.body_text())
    })?;

    let today = local_today(&state.local_timezone)?;
    let new_transaction = form.validate(today).inspect_err(|error| {
        tracing::debug!("rejected transaction: {error}");
    })?;

    let created = state
        .upstream
        .create_transaction(session.token(), &new_transaction)
        .await
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((
        StatusCode::CREATED,
        Json(created_transaction(created, new_transaction)),
    ))
}

/// Resolve the record the upstream API sent back after a create.
///
/// Some APIs only echo the new ID, in which case the submitted fields fill in
/// the rest.
fn created_transaction(created: RawTransaction, submitted: NewTransaction) -> Transaction {
    let id = created.id.clone();

    match normalize(created) {
        Some(transaction) => transaction,
        None => Transaction {
            id,
            parsed_date: parse_date(&submitted.date),
            date: submitted.date,
            time: submitted.time,
            kind: submitted.kind,
            category: submitted
                .tag
                .unwrap_or_else(|| UNTAGGED_LABEL.to_owned()),
            amount: submitted.amount,
            note: submitted.note,
        },
    }
}

/// Read a transaction ID from the request path.
///
/// Empty IDs and the dot segments "." and ".." are rejected since they would
/// name a different upstream resource.
fn parse_record_id(transaction_id: String) -> Result<RecordId, Error> {
    let trimmed = transaction_id.trim();
    if matches!(trimmed, "" | "." | "..") {
        return Err(Error::InvalidTransactionId(transaction_id));
    }

    match trimmed.parse::<i64>() {
        Ok(id) => Ok(RecordId::Number(id)),
        Err(_) => Ok(RecordId::Text(transaction_id)),
    }
}

/// A route handler for deleting a transaction, responds with `204 No Content`
/// on success.
pub async fn delete_transaction(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_record_id(transaction_id)?;

    state
        .upstream
        .delete_transaction(session.token(), &id)
        .await
        .inspect_err(|error| tracing::error!("could not delete transaction {id}: {error}"))?;

    Ok(StatusCode::NO_CONTENT)
}
