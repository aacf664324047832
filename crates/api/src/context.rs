use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

const REQUESTED_WITH: &str = "x-requested-with";

/// Who issued the request, which decides the response representation.
///
/// Scripts on our pages send `X-Requested-With: XMLHttpRequest` and get JSON;
/// everything else is a page load and gets rendered HTML.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    Ajax,
    Browser,
}

impl RequestOrigin {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_xhr = headers
            .get(REQUESTED_WITH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("xmlhttprequest"));

        if is_xhr { Self::Ajax } else { Self::Browser }
    }

    pub fn wants_json(self) -> bool {
        self == Self::Ajax
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
