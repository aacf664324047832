//! JSON rendering of product quantities.
//!
//! Prices, weights and quantities are `f64`, but clients expect whole numbers to
//! come back without a trailing `.0` (`10`, not `10.0`).

use serde::Serializer;

/// Largest magnitude at which every integral `f64` is exactly representable.
pub(crate) const MAX_EXACT: f64 = 9_007_199_254_740_991.0;

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
