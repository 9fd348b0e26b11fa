//! Map foreign errors raised inside leaf functions to ValidationError.

use serde_json::Value;

use crate::ValidationError;

/// Convert any error into a rejection of `value` by `predicate`.
/// Use in leaves: `.map_err(|e| e.into_validation_error("uuid", value))`.
pub trait IntoValidationError {
    fn into_validation_error(self, predicate: &str, value: &Value) -> ValidationError;
}

impl<E: std::error::Error> IntoValidationError for E {
    fn into_validation_error(self, predicate: &str, value: &Value) -> ValidationError {
        ValidationError::rejected(predicate, value.clone(), Some(&self.to_string()))
    }
}
