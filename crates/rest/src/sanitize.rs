//! JSON-safe rendering of chain-native numbers.
//!
//! Balances and other chain quantities routinely exceed what a consumer's
//! double-precision JSON parser can represent. Every integer leaf outside the
//! safe range is rewritten to its decimal string; everything else is left
//! untouched, so the transform is idempotent and shape-preserving.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::ApiError;

/// Largest integer a binary64 float represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

fn is_safe(number: &Number) -> bool {
    if let Some(x) = number.as_u64() {
        return x <= MAX_SAFE_INTEGER;
    }

    if let Some(x) = number.as_i64() {
        return x.unsigned_abs() <= MAX_SAFE_INTEGER;
    }

    // non-integers are plain floats; anything else is an integer too wide
    // for 64 bits
    number.is_f64()
}

pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Number(n) if !is_safe(&n) => Value::String(n.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, sanitize(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Response body that is sanitized before being written.
pub struct SanitizedJson<T>(pub T);

impl<T: Serialize> SanitizedJson<T> {
    pub fn into_value(self) -> Result<Value, ApiError> {
        let value = serde_json::to_value(&self.0)
            .map_err(|e| ApiError::internal(format!("failed to serialize response: {e}")))?;

        Ok(sanitize(value))
    }
}

impl<T: Serialize> IntoResponse for SanitizedJson<T> {
    fn into_response(self) -> Response {
        match self.into_value() {
            Ok(value) => Json(value).into_response(),
            Err(err) => err.into_response(),
        }
    }
}
