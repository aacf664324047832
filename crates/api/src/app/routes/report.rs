use std::sync::Arc;

use axum::extract::Extension;

use crate::app::dto::ReportPage;
use crate::app::errors::ApiError;
use crate::app::reply::Reply;
use crate::app::services::AppServices;
use crate::app::views;
use crate::context::RequestOrigin;

pub async fn inventory_report(
    Extension(services): Extension<Arc<AppServices>>,
    origin: RequestOrigin,
) -> Result<Reply, ApiError> {
    let report = services.store().inventory_report().await?;
    tracing::debug!(
        products = report.products.len(),
        empty = report.is_empty(),
        "inventory report built"
    );

    let page = ReportPage { report: &report };
    Reply::ok().negotiate(origin, &report, services.views(), views::INVENTORY_REPORT, &page)
}
