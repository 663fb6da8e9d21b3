//! Tags are the labels users group transactions by.
//!
//! They live in the upstream API; this module only lists them.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::Session,
    transaction::{RecordId, TransactionType},
    upstream::UpstreamClient,
};

/// A tag as listed by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// The upstream ID.
    #[serde(default)]
    pub id: Option<RecordId>,
    /// The tag's display name.
    pub name: String,
    /// The kind of transaction the tag is meant for, if restricted.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
}

/// Route handler that lists the current user's tags.
pub async fn get_tags(
    State(upstream): State<UpstreamClient>,
    session: Session,
) -> Result<Json<Vec<Tag>>, Error> {
    let tags = upstream
        .tags(session.token())
        .await
        .inspect_err(|error| tracing::error!("could not get tags: {error}"))?;

    Ok(Json(tags))
}
