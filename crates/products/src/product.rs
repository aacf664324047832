use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockroom_core::{DomainError, DomainResult};

stockroom_core::uuid_newtype!(
    /// Product identifier (the only well-formed `:id` path token).
    pub struct ProductId, "ProductId"
);

/// Raw write payload as posted by a client.
///
/// Every field is optional JSON so that coercion and "required" checks happen in
/// one place ([`NewProduct::validate`] / [`ProductPatch::validate`]) instead of
/// failing inside the JSON extractor. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: Option<JsonValue>,
    #[serde(default)]
    pub price: Option<JsonValue>,
    #[serde(default)]
    pub weight: Option<JsonValue>,
    #[serde(default)]
    pub quantity: Option<JsonValue>,
}

/// A validated product that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub weight: f64,
    pub quantity: f64,
}

impl NewProduct {
    /// Validate a create payload: `name`, `price` and `weight` are required,
    /// `quantity` defaults to 0.
    pub fn validate(input: ProductInput) -> DomainResult<Self> {
        let mut errors = Collector::default();

        let name = errors.take(required(input.name.as_ref(), "name", coerce_name));
        let price = errors.take(required(input.price.as_ref(), "price", coerce_number));
        let weight = errors.take(required(input.weight.as_ref(), "weight", coerce_number));
        let quantity = errors.take(match input.quantity.as_ref() {
            None => Ok(0.0),
            Some(v) => coerce_number(v, "quantity"),
        });

        errors.finish()?;

        let (Some(name), Some(price), Some(weight), Some(quantity)) = (name, price, weight, quantity)
        else {
            return Err(DomainError::validation("product validation failed"));
        };

        let product = Self {
            name,
            price,
            weight,
            quantity,
        };
        product.check()?;
        Ok(product)
    }

    /// Record-level invariants shared by create and update.
    fn check(&self) -> DomainResult<()> {
        if self.name.is_empty() {
            return Err(DomainError::required("name"));
        }
        for (path, value) in [
            ("price", self.price),
            ("weight", self.weight),
            ("quantity", self.quantity),
        ] {
            if !value.is_finite() {
                return Err(DomainError::cast("Number", &JsonValue::from(value), path));
            }
        }
        // Stock value must stay representable for the report.
        let value = self.price * self.quantity;
        if !value.is_finite() {
            return Err(DomainError::cast("Number", &JsonValue::from(self.quantity), "quantity"));
        }
        Ok(())
    }
}

/// A validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub weight: Option<f64>,
    pub quantity: Option<f64>,
}

impl ProductPatch {
    /// Validate an update payload. Only the supplied fields are checked, with
    /// the same coercion rules as create.
    pub fn validate(input: ProductInput) -> DomainResult<Self> {
        let mut errors = Collector::default();

        let name = errors.take(optional(input.name.as_ref(), "name", coerce_name));
        let price = errors.take(optional(input.price.as_ref(), "price", coerce_number));
        let weight = errors.take(optional(input.weight.as_ref(), "weight", coerce_number));
        let quantity = errors.take(optional(input.quantity.as_ref(), "quantity", coerce_number));

        errors.finish()?;

        Ok(Self {
            name: name.flatten(),
            price: price.flatten(),
            weight: weight.flatten(),
            quantity: quantity.flatten(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.weight.is_none() && self.quantity.is_none()
    }
}

/// Stored product record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    #[serde(serialize_with = "crate::number::serialize")]
    price: f64,
    #[serde(serialize_with = "crate::number::serialize")]
    weight: f64,
    #[serde(serialize_with = "crate::number::serialize")]
    quantity: f64,
}

impl Product {
    pub fn new(id: ProductId, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            weight: fields.weight,
            quantity: fields.quantity,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Stock value of this product (price × quantity).
    pub fn value(&self) -> f64 {
        self.price * self.quantity
    }

    /// Overwrite the patched fields, then re-run the record validators.
    ///
    /// On error `self` is left unchanged.
    pub fn apply(&mut self, patch: &ProductPatch) -> DomainResult<()> {
        let merged = NewProduct {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            price: patch.price.unwrap_or(self.price),
            weight: patch.weight.unwrap_or(self.weight),
            quantity: patch.quantity.unwrap_or(self.quantity),
        };
        merged.check()?;
        *self = Product::new(self.id, merged);
        Ok(())
    }
}

#[derive(Default)]
struct Collector {
    messages: Vec<String>,
}

impl Collector {
    fn take<T>(&mut self, result: DomainResult<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(DomainError::Validation(msg)) => {
                self.messages.push(msg);
                None
            }
            Err(other) => {
                self.messages.push(other.to_string());
                None
            }
        }
    }

    fn finish(self) -> DomainResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.messages.join(", ")))
        }
    }
}

fn required<T>(
    value: Option<&JsonValue>,
    path: &str,
    coerce: fn(&JsonValue, &str) -> DomainResult<T>,
) -> DomainResult<T> {
    match value {
        None | Some(JsonValue::Null) => Err(DomainError::required(path)),
        Some(v) => coerce(v, path),
    }
}

fn optional<T>(
    value: Option<&JsonValue>,
    path: &str,
    coerce: fn(&JsonValue, &str) -> DomainResult<T>,
) -> DomainResult<Option<T>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => coerce(v, path).map(Some),
    }
}

/// Numbers may arrive as JSON numbers, numeric strings (form posts) or
/// booleans (`true` is 1, `false` is 0).
pub(crate) fn coerce_number(value: &JsonValue, path: &str) -> DomainResult<f64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) if s.trim().is_empty() => return Err(DomainError::required(path)),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(DomainError::cast("Number", value, path)),
    }
}

/// Names may arrive as strings, numbers or booleans and are stored as text.
fn coerce_name(value: &JsonValue, path: &str) -> DomainResult<String> {
    match value {
        JsonValue::String(s) if s.is_empty() => Err(DomainError::required(path)),
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(number_text(n)),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(DomainError::cast("string", other, path)),
    }
}

/// `1.0` reads as `1`, like any other whole number.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= crate::number::MAX_EXACT => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}
