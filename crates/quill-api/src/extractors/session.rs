//! `SessionToken` extractor: pulls the session cookie out of the request.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::state::AppState;

/// The raw session token from the configured cookie, if one was sent.
///
/// Never rejects; verification is up to the handler.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(state.cookie_name())
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self(token))
    }
}
