//! Implements a struct that holds the state of the REST server.

use crate::{Error, timezone::get_local_offset, upstream::UpstreamClient};

/// The number of recent transactions listed when a request does not ask for a
/// specific number.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the upstream API that owns users' transactions.
    pub upstream: UpstreamClient,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The number of recent transactions to list when no limit is given.
    pub recent_limit: usize,
}

impl AppState {
    /// Create a new [AppState] that reads transactions from `upstream_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the timezone is not recognised or the HTTP client
    /// cannot be built.
    pub fn new(
        upstream_url: &str,
        local_timezone: &str,
        recent_limit: usize,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            upstream: UpstreamClient::new(upstream_url)?,
            local_timezone: local_timezone.to_owned(),
            recent_limit,
        })
    }
}
