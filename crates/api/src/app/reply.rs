//! Successful responses.
//!
//! Handlers return `Result<Reply, ApiError>`: exactly one response per request,
//! built through `json`, `view` or `empty`.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::app::errors::ApiError;
use crate::app::views::Views;
use crate::context::RequestOrigin;

#[derive(Debug)]
enum Body {
    Json(JsonValue),
    Html(String),
    Empty,
}

#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    body: Body,
}

impl Reply {
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            body: Body::Empty,
        }
    }

    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            body: Body::Json(value),
            ..self
        })
    }

    pub fn view<T: Serialize>(self, views: &Views, template: &str, data: &T) -> Result<Self, ApiError> {
        let html = views.render(template, data)?;
        Ok(Self {
            body: Body::Html(html),
            ..self
        })
    }

    pub fn empty(self) -> Self {
        Self {
            body: Body::Empty,
            ..self
        }
    }

    /// JSON for script requests, the rendered page for page loads. Both come
    /// from the same data.
    pub fn negotiate<J, P>(
        self,
        origin: RequestOrigin,
        json: &J,
        views: &Views,
        template: &str,
        page: &P,
    ) -> Result<Self, ApiError>
    where
        J: Serialize,
        P: Serialize,
    {
        if origin.wants_json() {
            self.json(json)
        } else {
            self.view(views, template, page)
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Body::Json(value) => (self.status, axum::Json(value)).into_response(),
            Body::Html(html) => (self.status, Html(html)).into_response(),
            Body::Empty => self.status.into_response(),
        }
    }
}
