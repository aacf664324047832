use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    routing::{get, put},
    Json, Router,
};

use stockroom_products::{NewProduct, ProductInput, ProductPatch};

use crate::app::dto::{self, ListProductsQuery, ProductListPage};
use crate::app::errors::ApiError;
use crate::app::reply::Reply;
use crate::app::services::AppServices;
use crate::app::views;
use crate::context::RequestOrigin;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    origin: RequestOrigin,
    params: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Reply, ApiError> {
    let params = dto::list_params(params)?;
    let query = params.to_query()?;
    let products = services.store().list(&query).await?;

    let page = ProductListPage {
        products: &products,
        query: &params,
    };
    Reply::ok().negotiate(origin, &products, services.views(), views::PRODUCT_LIST, &page)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Reply, ApiError> {
    let draft = NewProduct::validate(dto::json_body(body)?)?;
    let product = services.store().insert(draft).await?;

    tracing::info!(product_id = %product.id(), name = product.name(), "product created");
    Reply::ok().json(&product)
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Reply, ApiError> {
    let id = dto::parse_product_id(&id)?;
    let patch = ProductPatch::validate(dto::json_body(body)?)?;

    let product = services
        .store()
        .update(id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(product_id = %id, "product updated");
    Reply::ok().json(&product)
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Reply, ApiError> {
    let id = dto::parse_product_id(&id)?;

    let removed = services.store().delete(id).await?.ok_or(ApiError::NotFound)?;

    tracing::info!(product_id = %id, name = removed.name(), "product deleted");
    Ok(Reply::ok().empty())
}
