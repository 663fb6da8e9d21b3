//! Client for the upstream REST API that owns users' transactions and tags.
//!
//! Every call forwards the caller's bearer token, this service never holds
//! credentials of its own.

use std::time::Duration;

use axum::extract::FromRef;
use reqwest::Url;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    AppState, Error,
    tag::Tag,
    transaction::{NewTransaction, RawTransaction, RecordId},
};

/// The upstream path for listing and creating transactions.
pub(crate) const TRANSACTIONS_PATH: &str = "/transactions";
/// The upstream path for listing tags.
pub(crate) const TAGS_PATH: &str = "/tags";

/// How long to wait for the upstream API before giving up on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream responses come either bare or wrapped in a `data` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// An async client for the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl FromRef<AppState> for UpstreamClient {
    fn from_ref(state: &AppState) -> Self {
        state.upstream.clone()
    }
}

impl UpstreamClient {
    /// Create a client for the API at `base_url`, e.g. "https://api.example.com/v1".
    ///
    /// # Errors
    /// Returns [Error::UpstreamUnavailable] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get every transaction visible to `token`.
    ///
    /// Records that are not JSON objects are skipped with a warning.
    ///
    /// # Errors
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body is not a list.
    pub async fn transactions(&self, token: &str) -> Result<Vec<RawTransaction>, Error> {
        let entries = self.get_list(token, TRANSACTIONS_PATH).await?;

        Ok(decode_entries(entries, "transaction"))
    }

    /// Create a transaction and return the record the API stored.
    ///
    /// # Errors
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body is not a transaction.
    pub async fn create_transaction(
        &self,
        token: &str,
        transaction: &NewTransaction,
    ) -> Result<RawTransaction, Error> {
        let response = self
            .http
            .post(self.url(TRANSACTIONS_PATH))
            .bearer_auth(token)
            .json(transaction)
            .send()
            .await?;

        let envelope: Envelope<RawTransaction> = handle_response(response).await?;

        Ok(envelope.into_inner())
    }

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the API responds with a
    /// non-success status.
    pub async fn delete_transaction(&self, token: &str, id: &RecordId) -> Result<(), Error> {
        let response = self
            .http
            .delete(self.record_url(TRANSACTIONS_PATH, id)?)
            .bearer_auth(token)
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    /// Get the tags visible to `token`.
    ///
    /// # Errors
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body is not a list.
    pub async fn tags(&self, token: &str) -> Result<Vec<Tag>, Error> {
        let entries = self.get_list(token, TAGS_PATH).await?;

        Ok(decode_entries(entries, "tag"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The URL of one record under `path`, with `id` encoded as a single path
    /// segment so it cannot change the path, query or fragment.
    fn record_url(&self, path: &str, id: &RecordId) -> Result<Url, Error> {
        let mut url = Url::parse(&self.url(path)).map_err(|error| {
            Error::UpstreamUnavailable(format!("invalid upstream URL {}: {error}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::UpstreamUnavailable(format!("{} cannot have a path", self.base_url))
            })?
            .push(&id.to_string());

        Ok(url)
    }

    async fn get_list(&self, token: &str, path: &str) -> Result<Vec<Value>, Error> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        let envelope: Envelope<Vec<Value>> = handle_response(response).await?;

        Ok(envelope.into_inner())
    }
}

/// Decode each entry on its own so one malformed record does not fail the list.
fn decode_entries<T: DeserializeOwned>(entries: Vec<Value>, kind: &str) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value(entry)
                .inspect_err(|error| tracing::warn!("skipping malformed {kind}: {error}"))
                .ok()
        })
        .collect()
}

/// Turn a non-success response into [Error::Upstream].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_owned());
    tracing::warn!("upstream API responded with {status}: {message}");

    Err(Error::Upstream {
        status: status.as_u16(),
        message,
    })
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let body = check_status(response).await?.text().await?;

    serde_json::from_str(&body).map_err(Error::from)
}
