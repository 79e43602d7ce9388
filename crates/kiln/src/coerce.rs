//! Conversion of raw tokens into typed scalars.
//!
//! The target type is never declared directly: it is inferred from the
//! parameter's default value. Only the token can fail to convert; a reference
//! of an unknown type simply disables coercion.

use thiserror::Error;

use crate::value::{ScalarKind, Value};

const TRUE_WORDS: &[&str] = &["true", "yes", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "no", "off", "0"];

/// A token could not be converted to the type of its reference default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is not a valid {expected}")]
pub struct CoercionError {
    /// The offending token.
    pub value: String,
    /// The scalar type the reference default asked for.
    pub expected: ScalarKind,
}

impl CoercionError {
    fn new(value: &str, expected: ScalarKind) -> Self {
        Self {
            value: value.to_owned(),
            expected,
        }
    }
}

/// Converts `token` into the scalar type of `reference`.
///
/// Booleans accept `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0` in any
/// case. Integers are parsed in base 10 and floats as floating-point
/// literals. String, absent and opaque references return the token unchanged.
///
/// # Errors
///
/// Returns [`CoercionError`] when the token is not a valid literal of the
/// reference's type.
pub fn coerce(token: &str, reference: &Value) -> Result<Value, CoercionError> {
    match reference.kind() {
        Some(ScalarKind::Boolean) => parse_bool(token).map(Value::Bool),
        Some(ScalarKind::Integer) => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CoercionError::new(token, ScalarKind::Integer)),
        Some(ScalarKind::Float) => token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoercionError::new(token, ScalarKind::Float)),
        Some(ScalarKind::String) | None => Ok(Value::Str(token.to_owned())),
    }
}

fn parse_bool(token: &str) -> Result<bool, CoercionError> {
    let lowered = token.to_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(CoercionError::new(token, ScalarKind::Boolean))
    }
}
