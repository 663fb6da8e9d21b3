//! Middleware for logging requests and responses.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body logged at the `info`
/// level. Longer bodies are truncated, the full body is logged at `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Bodies larger than this are not buffered for logging.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level.
///
/// The session cookie and authorization headers are never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_text) = read_body(body).await else {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    };

    tracing::info!(
        "Received request: {} {} {:#?}\nbody: {}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers),
        truncate(&body_text)
    );
    log_full_body("request", &body_text);

    let request = Request::from_parts(parts, Body::from(body_text));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let Some(body_text) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    tracing::info!(
        "Sending response: {} {:#?}\nbody: {}",
        parts.status,
        redact_headers(&parts.headers),
        truncate(&body_text)
    );
    log_full_body("response", &body_text);

    Response::from_parts(parts, Body::from(body_text))
}

async fn read_body(body: Body) -> Option<String> {
    let bytes = to_bytes(body, MAX_BODY_SIZE)
        .await
        .inspect_err(|error| tracing::error!("could not read body for logging: {error}"))
        .ok()?;

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    for name in [AUTHORIZATION, COOKIE, SET_COOKIE] {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }

    headers
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a
/// character.
fn truncate(body: &str) -> String {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return format!("{body:?}");
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{:?}...", &body[..end])
}

fn log_full_body(kind: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full {kind} body: {body:?}");
    }
}
