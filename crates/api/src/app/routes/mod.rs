use axum::{routing::get, Router};

pub mod products;
pub mod report;
pub mod system;

/// Application routes (everything except `/health`).
pub fn router() -> Router {
    Router::new()
        .route("/scripts.mjs", get(system::browser_script))
        .route("/inventory-report", get(report::inventory_report))
        .nest("/products", products::router())
}
