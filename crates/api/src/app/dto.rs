use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use stockroom_core::DomainResult;
use stockroom_products::query::parse_price_bound;
use stockroom_products::{InventoryReport, Product, ProductId, ProductInput, ProductQuery, SortField, SortOrder};

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Query string of `GET /products`. Every parameter is an optional string;
/// empty strings (blank form fields) count as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListProductsQuery {
    pub fn to_query(&self) -> DomainResult<ProductQuery> {
        let mut query = ProductQuery::all();

        if let Some(name) = non_empty(&self.name) {
            query = query.with_name(name);
        }
        if let Some(min) = parse_price_bound(self.min_price.as_deref())? {
            query = query.with_min_price(min);
        }
        if let Some(max) = parse_price_bound(self.max_price.as_deref())? {
            query = query.with_max_price(max);
        }
        if let Some(raw) = non_empty(&self.sort_by) {
            match SortField::parse(raw) {
                Some(field) => {
                    query = query.sorted_by(field, SortOrder::parse(self.sort_order.as_deref()));
                }
                None => tracing::debug!(sort_by = raw, "ignoring unknown sort field"),
            }
        }

        Ok(query)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Unwrap the list query string. A string serde cannot map (e.g. a repeated
/// key) is a client error.
pub fn list_params(
    params: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<ListProductsQuery, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))
}

/// Unwrap a write body. No JSON body at all reads as an empty object; a body
/// that is not a JSON object fails the same way a missing field does.
pub fn json_body(body: Result<Json<ProductInput>, JsonRejection>) -> Result<ProductInput, ApiError> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ProductInput::default()),
        Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<ProductId>().map_err(|_| ApiError::InvalidId)
}

// -------------------------
// Page models
// -------------------------

/// Data handed to the product list template.
#[derive(Debug, Serialize)]
pub struct ProductListPage<'a> {
    pub products: &'a [Product],
    pub query: &'a ListProductsQuery,
}

/// Data handed to the inventory report template.
#[derive(Debug, Serialize)]
pub struct ReportPage<'a> {
    pub report: &'a InventoryReport,
}
