pub mod dashboard;
pub mod product_types;
pub mod products;
pub mod stock_movements;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// Largest value a `NUMERIC(12, 2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

pub(crate) fn required_name(raw: &str, field: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(name.to_string())
}

pub(crate) fn non_negative_price(value: Decimal, field: &str) -> AppResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    if value > MAX_PRICE {
        return Err(AppError::BadRequest(format!(
            "{field} must not exceed {MAX_PRICE}"
        )));
    }
    Ok(value)
}

/// Blank optional text is stored as NULL.
pub(crate) fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Keeps an explicit `null` apart from an absent field: absent is `None`,
/// `null` is `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
