//! Reads the caller's bearer token from the session cookie.
//!
//! The token is issued by the upstream API when the user signs in. It is
//! forwarded as-is and never inspected or logged here.

use std::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::Error;

/// The name of the cookie holding the upstream bearer token.
pub const COOKIE_TOKEN: &str = "token";

/// The token of the user making the request.
///
/// Handlers that take a [Session] argument respond with 401 Unauthorized when
/// the cookie is missing or empty.
#[derive(Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// The bearer token to forward upstream.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"********")
            .finish()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        match jar
            .get(COOKIE_TOKEN)
            .map(|cookie| cookie.value().trim().to_owned())
            .filter(|token| !token.is_empty())
        {
            Some(token) => Ok(Session { token }),
            None => {
                tracing::debug!("no token cookie for {}", parts.uri.path());
                Err(Error::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;

    use super::{COOKIE_TOKEN, Session};

    async fn echo_token(session: Session) -> String {
        session.token().to_owned()
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route("/protected", get(echo_token));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn extracts_token_from_cookie() {
        let server = get_test_server();

        let response = server
            .get("/protected")
            .add_cookie(Cookie::new(COOKIE_TOKEN, "abc.def.ghi"))
            .await;

        response.assert_status_ok();
        response.assert_text("abc.def.ghi");
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthorized() {
        let server = get_test_server();

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_cookie_is_unauthorized() {
        let server = get_test_server();

        server
            .get("/protected")
            .add_cookie(Cookie::new(COOKIE_TOKEN, ""))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session {
            token: "secret".to_owned(),
        };

        assert!(!format!("{session:?}").contains("secret"));
    }
}
