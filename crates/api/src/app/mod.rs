//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage and view registry shared by all handlers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: query/body mapping and page models
//! - `reply.rs` / `errors.rs`: the success and failure halves of every response
//! - `views.rs`: handlebars templates

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod reply;
pub mod routes;
pub mod services;
pub mod views;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
