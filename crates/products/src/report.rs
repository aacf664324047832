//! Inventory report: stock totals and per-product valuation.

use serde::Serialize;

use crate::product::Product;

/// Valuation line for a single product (`value` = price × quantity).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductValuation {
    pub name: String,
    #[serde(serialize_with = "crate::number::serialize")]
    pub quantity: f64,
    #[serde(serialize_with = "crate::number::serialize")]
    pub value: f64,
}

/// Aggregate over the whole product collection.
///
/// An empty collection yields the zero report rather than "no report".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    #[serde(serialize_with = "crate::number::serialize")]
    pub total_quantity: f64,
    #[serde(serialize_with = "crate::number::serialize")]
    pub total_value: f64,
    pub products: Vec<ProductValuation>,
}

impl InventoryReport {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut report, product| {
                let value = product.value();
                report.total_quantity += product.quantity();
                report.total_value += value;
                report.products.push(ProductValuation {
                    name: product.name().to_string(),
                    quantity: product.quantity(),
                    value,
                });
                report
            })
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
