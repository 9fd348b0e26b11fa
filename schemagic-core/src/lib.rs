//! Schemagic core: describe the shape of data with plain data, validate and coerce values against it,
//! and guard function boundaries with input/output schemas.

pub mod config;
pub mod dispatch;
pub mod guard;
pub mod into_validation_error;
pub mod matchers;
pub mod schema;
pub mod validators;
pub mod value;

pub use config::{ValidationConfig, ValidationMode};
pub use dispatch::Dispatcher;
pub use guard::{guard, Args, Guard, Packing, Side, ValidationPredicate, Validator};
pub use into_validation_error::IntoValidationError;
pub use matchers::validate;
pub use schema::{Leaf, Schema, SchemaKey, SchemaShape};
pub use serde_json::{json, Map, Value};

use thiserror::Error;

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("schema cannot be classified: {0}")]
    Classification(String),
    #[error("missing keys {keys:?} for value {value}")]
    MissingKeys { keys: Vec<String>, value: Value },
    #[error("sequence has {found} elements but its schema prescribes {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("{message}")]
    PredicateRejected {
        predicate: String,
        value: Value,
        message: String,
    },
    #[error("expected {expected}, got {found}: {value}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        value: Value,
    },
    #[error("no dispatch handler matched arguments {args}")]
    NoDispatchMatch { args: String },
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Bad value provided for {subject}. - error: {}: {source} schema: {schema} value: {value}", .source.kind())]
    InputBoundary {
        subject: String,
        schema: String,
        value: Value,
        source: Box<ValidationError>,
    },
    #[error("Bad value provided for {subject}. - error: {}: {source} schema: {schema} value: {value}", .source.kind())]
    OutputBoundary {
        subject: String,
        schema: String,
        value: Value,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Rejection of `value` by the predicate `predicate`. The message always ends with the value.
    pub fn rejected(predicate: impl Into<String>, value: Value, message: Option<&str>) -> Self {
        let predicate = predicate.into();
        let message = match message {
            Some(m) => format!("{}, got {}", m, value),
            None => format!("value failed predicate '{}', got {}", predicate, value),
        };
        ValidationError::PredicateRejected {
            predicate,
            value,
            message,
        }
    }

    pub fn type_mismatch(expected: &'static str, value: &Value) -> Self {
        ValidationError::TypeMismatch {
            expected,
            found: crate::value::type_name(value),
            value: value.clone(),
        }
    }

    /// Variant name, used as the error label inside boundary messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Classification(_) => "ClassificationError",
            ValidationError::MissingKeys { .. } => "MissingKeys",
            ValidationError::LengthMismatch { .. } => "LengthMismatch",
            ValidationError::PredicateRejected { .. } => "PredicateRejected",
            ValidationError::TypeMismatch { .. } => "TypeMismatch",
            ValidationError::NoDispatchMatch { .. } => "NoDispatchMatch",
            ValidationError::InvalidPattern(_) => "InvalidPattern",
            ValidationError::InputBoundary { .. } => "InputBoundaryError",
            ValidationError::OutputBoundary { .. } => "OutputBoundaryError",
        }
    }

    /// True for failures on the input side of a guard or endpoint (client errors).
    pub fn is_input(&self) -> bool {
        matches!(self, ValidationError::InputBoundary { .. })
    }

    /// The error wrapped by a boundary failure, or `self` for matcher-level errors.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            ValidationError::InputBoundary { source, .. }
            | ValidationError::OutputBoundary { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
