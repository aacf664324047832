//! Product filter/sort query.
//!
//! A `ProductQuery` is the storage-independent form of the list endpoint's
//! query string. The in-memory store evaluates it with [`ProductQuery::apply`];
//! SQL-backed stores translate the same fields into a WHERE/ORDER BY clause.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockroom_core::DomainResult;

use crate::product::{Product, coerce_number};

/// Fields a client may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Price,
    Weight,
    Quantity,
}

impl SortField {
    /// Parse a client-supplied field name. Anything outside the allow-list is
    /// `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "weight" => Some(Self::Weight),
            "quantity" => Some(Self::Quantity),
            _ => None,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name().cmp(b.name()),
            Self::Price => a.price().total_cmp(&b.price()),
            Self::Weight => a.weight().total_cmp(&b.weight()),
            Self::Quantity => a.quantity().total_cmp(&b.quantity()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` sorts descending; anything else (including nothing) ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn is_desc(self) -> bool {
        self == Self::Desc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    name: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: Option<SortSpec>,
}

impl ProductQuery {
    /// Query matching every product in natural order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on `name`.
    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name = Some(needle.into());
        self
    }

    /// Inclusive lower bound on `price`.
    pub fn with_min_price(mut self, min: f64) -> Self {
        self.min_price = Some(min);
        self
    }

    /// Inclusive upper bound on `price`.
    pub fn with_max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some(SortSpec { field, order });
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.name {
            if !product.name().to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price() > max {
                return false;
            }
        }
        true
    }

    /// Filter, then stable-sort. Without a sort the input order is kept.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut out: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        if let Some(SortSpec { field, order }) = self.sort {
            out.sort_by(|a, b| {
                let ord = field.compare(a, b);
                if order.is_desc() { ord.reverse() } else { ord }
            });
        }
        out
    }
}

/// Parse a query-string price bound. Empty or absent means "no bound"; a
/// non-numeric value fails the same way a numeric field cast does.
pub fn parse_price_bound(raw: Option<&str>) -> DomainResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => coerce_number(&JsonValue::String(s.to_string()), "price").map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{NewProduct, ProductId};
    use stockroom_core::DomainError;

    fn product(name: &str, price: f64, weight: f64, quantity: f64) -> Product {
        Product::new(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                price,
                weight,
                quantity,
            },
        )
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Widget", 15.0, 2.0, 4.0),
            product("Gadget", 8.0, 1.0, 9.0),
            product("WIDGET-2", 25.0, 3.0, 1.0),
            product("sprocket", 10.0, 0.5, 0.0),
            product("Bigwidget", 20.0, 7.0, 2.0),
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(Product::name).collect()
    }

    #[test]
    fn empty_query_keeps_natural_order() {
        let out = ProductQuery::all().apply(catalog());
        assert_eq!(names(&out), ["Widget", "Gadget", "WIDGET-2", "sprocket", "Bigwidget"]);
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let out = ProductQuery::all().with_name("wid").apply(catalog());
        assert_eq!(names(&out), ["Widget", "WIDGET-2", "Bigwidget"]);
    }

    #[test]
    fn name_filter_is_literal_not_a_pattern() {
        let products = vec![product("a.b", 1.0, 1.0, 1.0), product("axb", 1.0, 1.0, 1.0)];
        let out = ProductQuery::all().with_name("a.b").apply(products);
        assert_eq!(names(&out), ["a.b"]);
    }

    #[test]
    fn price_bounds_are_inclusive_and_combine() {
        let out = ProductQuery::all()
            .with_min_price(10.0)
            .with_max_price(20.0)
            .apply(catalog());
        assert_eq!(names(&out), ["Widget", "sprocket", "Bigwidget"]);

        let out = ProductQuery::all().with_min_price(20.0).apply(catalog());
        assert_eq!(names(&out), ["WIDGET-2", "Bigwidget"]);

        let out = ProductQuery::all().with_max_price(8.0).apply(catalog());
        assert_eq!(names(&out), ["Gadget"]);
    }

    #[test]
    fn sorts_by_single_field() {
        let out = ProductQuery::all()
            .sorted_by(SortField::Price, SortOrder::Asc)
            .apply(catalog());
        assert_eq!(names(&out), ["Gadget", "sprocket", "Widget", "Bigwidget", "WIDGET-2"]);

        let out = ProductQuery::all()
            .sorted_by(SortField::Weight, SortOrder::Desc)
            .apply(catalog());
        assert_eq!(names(&out), ["Bigwidget", "WIDGET-2", "Widget", "Gadget", "sprocket"]);
    }

    #[test]
    fn name_sort_is_bytewise() {
        let out = ProductQuery::all()
            .sorted_by(SortField::Name, SortOrder::Asc)
            .apply(catalog());
        assert_eq!(names(&out), ["Bigwidget", "Gadget", "WIDGET-2", "Widget", "sprocket"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let products = vec![
            product("first", 5.0, 1.0, 1.0),
            product("second", 5.0, 1.0, 1.0),
            product("cheap", 1.0, 1.0, 1.0),
        ];
        let out = ProductQuery::all()
            .sorted_by(SortField::Price, SortOrder::Asc)
            .apply(products);
        assert_eq!(names(&out), ["cheap", "first", "second"]);
    }

    #[test]
    fn filter_and_sort_combine() {
        let out = ProductQuery::all()
            .with_name("widget")
            .with_max_price(20.0)
            .sorted_by(SortField::Quantity, SortOrder::Desc)
            .apply(catalog());
        assert_eq!(names(&out), ["Widget", "Bigwidget"]);
    }

    #[test]
    fn sort_field_allow_list() {
        assert_eq!(SortField::parse("price"), Some(SortField::Price));
        assert_eq!(SortField::parse("quantity"), Some(SortField::Quantity));
        assert_eq!(SortField::parse("_id"), None);
        assert_eq!(SortField::parse("Price"), None);
        assert_eq!(SortField::parse("price; drop table"), None);
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
    }

    #[test]
    fn price_bound_parsing() {
        assert_eq!(parse_price_bound(None).unwrap(), None);
        assert_eq!(parse_price_bound(Some("")).unwrap(), None);
        assert_eq!(parse_price_bound(Some("10")).unwrap(), Some(10.0));
        assert_eq!(parse_price_bound(Some(" 2.5 ")).unwrap(), Some(2.5));

        let err = parse_price_bound(Some("ten")).unwrap_err();
        assert_eq!(err, DomainError::cast("Number", &serde_json::json!("ten"), "price"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: every returned product lies within the bounds, and
            /// every product within the bounds is returned.
            #[test]
            fn price_bounds_partition_the_catalog(
                prices in proptest::collection::vec(0u32..1000, 0..40),
                lo in 0u32..1000,
                span in 0u32..500,
            ) {
                let (min, max) = (lo as f64, (lo + span) as f64);
                let products: Vec<Product> = prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| product(&format!("p{i}"), *p as f64, 1.0, 1.0))
                    .collect();

                let out = ProductQuery::all()
                    .with_min_price(min)
                    .with_max_price(max)
                    .apply(products.clone());

                prop_assert!(out.iter().all(|p| p.price() >= min && p.price() <= max));
                let expected = products.iter().filter(|p| p.price() >= min && p.price() <= max).count();
                prop_assert_eq!(out.len(), expected);
            }

            /// Property: sorted output is ordered and a permutation of the filter result.
            #[test]
            fn sorted_output_is_ordered(
                prices in proptest::collection::vec(0u32..100, 0..40),
                desc in any::<bool>(),
            ) {
                let products: Vec<Product> = prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| product(&format!("p{i}"), *p as f64, 1.0, 1.0))
                    .collect();
                let order = if desc { SortOrder::Desc } else { SortOrder::Asc };

                let out = ProductQuery::all().sorted_by(SortField::Price, order).apply(products.clone());

                prop_assert_eq!(out.len(), products.len());
                for pair in out.windows(2) {
                    if desc {
                        prop_assert!(pair[0].price() >= pair[1].price());
                    } else {
                        prop_assert!(pair[0].price() <= pair[1].price());
                    }
                }
            }
        }
    }
}
