use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

const BROWSER_SCRIPT: &str = include_str!("../../../static/scripts.mjs");

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The filter form's script, served verbatim.
pub async fn browser_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        BROWSER_SCRIPT,
    )
}
