//! Slipbook is a reporting service for personal finance transactions.
//!
//! It fetches a user's transactions from an upstream REST API, forwarding the
//! user's bearer token, and serves summaries, monthly series, category
//! breakdowns and recent-transaction lists as JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod dashboard;
mod endpoints;
mod logging;
mod not_found;
mod routing;
mod session;
mod tag;
mod timezone;
mod transaction;
mod upstream;

pub use app_state::{AppState, DEFAULT_RECENT_LIMIT};
pub use dashboard::{
    CategoryRow, CategoryTotal, CompressedSlices, DEFAULT_CATEGORY_TYPE, DEFAULT_OTHER_THRESHOLD,
    MonthlyPoint, RecentRow, Slice, Summary, build_category_series, build_monthly_series,
    build_recent, build_summary, build_total_summary, compress_slices, resolve_category_type,
    with_percentages,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::Session;
pub use tag::Tag;
pub use transaction::{
    RawTransaction, RecordId, Transaction, TransactionType, UNTAGGED_LABEL, is_same_month,
    month_key, normalize, normalize_all, parse_date, to_amount,
};
pub use upstream::UpstreamClient;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a session token.
    #[error("missing session token")]
    Unauthorized,

    /// A month outside 1 to 12 was requested.
    #[error("{0} is not a month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A query string parameter was missing, malformed or of the wrong type.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A transaction ID that cannot name an upstream record, e.g. "..".
    #[error("\"{0}\" is not a transaction ID")]
    InvalidTransactionId(String),

    /// A new transaction was missing a field or had a malformed one.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The upstream API responded with a non-success status.
    #[error("the upstream API responded with {status}: {message}")]
    Upstream {
        /// The HTTP status code.
        status: u16,
        /// The response body.
        message: String,
    },

    /// The upstream API could not be reached.
    #[error("could not reach the upstream API: {0}")]
    UpstreamUnavailable(String),

    /// The upstream API sent a body that could not be decoded.
    #[error("could not decode the upstream response: {0}")]
    InvalidUpstreamResponse(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Error::InvalidUpstreamResponse(error.to_string())
        } else {
            Error::UpstreamUnavailable(error.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::InvalidUpstreamResponse(error.to_string())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::InvalidMonth(_) | Error::InvalidQuery(_) | Error::InvalidTransactionId(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidTransaction(_) | Error::FutureDate(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Upstream { status, .. } => match *status {
                401 => StatusCode::UNAUTHORIZED,
                403 => StatusCode::FORBIDDEN,
                404 => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Error::UpstreamUnavailable(_) | Error::InvalidUpstreamResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            error => error.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use crate::Error;

    fn status_of(error: Error) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(status_of(Error::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(Error::InvalidMonth(13)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(Error::InvalidQuery("type: unknown variant".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::InvalidTransactionId("..".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::InvalidTransaction("no amount".to_owned())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(Error::FutureDate(date!(2999 - 01 - 01))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(Error::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_auth_and_not_found_pass_through() {
        for (upstream, expected) in [
            (401, StatusCode::UNAUTHORIZED),
            (403, StatusCode::FORBIDDEN),
            (404, StatusCode::NOT_FOUND),
            (400, StatusCode::BAD_GATEWAY),
            (500, StatusCode::BAD_GATEWAY),
            (503, StatusCode::BAD_GATEWAY),
        ] {
            let error = Error::Upstream {
                status: upstream,
                message: String::new(),
            };

            assert_eq!(status_of(error), expected, "upstream status {upstream}");
        }
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        assert_eq!(
            status_of(Error::UpstreamUnavailable("timed out".to_owned())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(Error::InvalidUpstreamResponse("not json".to_owned())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn invalid_timezone_is_internal_error() {
        assert_eq!(
            status_of(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn serde_errors_are_invalid_upstream_responses() {
        let error = serde_json::from_str::<Vec<i32>>("{").unwrap_err();

        assert!(matches!(Error::from(error), Error::InvalidUpstreamResponse(_)));
    }
}
