//! Leaf validators built from predicate + coercer + message, and the ones derived from it.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Number, Value};

use crate::matchers::validate;
use crate::schema::Schema;
use crate::value::{loosely_equal, to_plain_string};
use crate::ValidationError;

/// Coercer run before the predicate. May fail on its own.
pub type Coercer = Arc<dyn Fn(&Value) -> Result<Value, ValidationError> + Send + Sync>;

pub fn coercer(
    f: impl Fn(&Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
) -> Coercer {
    Arc::new(f)
}

/// Leaf that coerces the value (if a coercer is given), then requires `predicate` to hold
/// on the coerced value. Rejections carry `message` (or a default naming the predicate)
/// followed by the rejected value.
pub fn predicate_validator(
    name: impl Into<String>,
    predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    coercer: Option<Coercer>,
    message: Option<String>,
) -> Schema {
    let name = name.into();
    let predicate_name = name.clone();
    Schema::leaf(name, move |value| {
        let coerced = match &coercer {
            Some(coerce) => coerce(value)?,
            None => value.clone(),
        };
        if predicate(&coerced) {
            Ok(coerced)
        } else {
            Err(ValidationError::rejected(
                predicate_name.clone(),
                coerced,
                message.as_deref(),
            ))
        }
    })
}

/// String whose text form matches `pattern` from its first character (prefix match, not anchored
/// at the end). Non-strings are stringified first; the string is returned.
pub fn formatted_string(pattern: &str) -> Result<Schema, ValidationError> {
    let re = Regex::new(pattern)?;
    let message = format!("string not of expected format: expected: {}", pattern);
    Ok(predicate_validator(
        format!("formatted_string({:?})", pattern),
        move |value| {
            value
                .as_str()
                .and_then(|s| re.find(s))
                .is_some_and(|m| m.start() == 0)
        },
        Some(coercer(|value| {
            Ok(Value::String(to_plain_string(value)))
        })),
        Some(message),
    ))
}

pub const DATE_PATTERN: &str = r"\d+\-\d+\-\d+";
pub const DATETIME_PATTERN: &str = r"\d+\-\d+\-\d+ \d+:\d+:\d+\.\d+";

pub fn date_string() -> Result<Schema, ValidationError> {
    formatted_string(DATE_PATTERN)
}

pub fn datetime_string() -> Result<Schema, ValidationError> {
    formatted_string(DATETIME_PATTERN)
}

pub fn null() -> Schema {
    predicate_validator("null", Value::is_null, None, None)
}

/// Succeeds with the result of the first schema (in argument order) the value validates against.
pub fn or_(schemas: impl IntoIterator<Item = Schema>) -> Schema {
    let schemas: Vec<Schema> = schemas.into_iter().collect();
    let name = format!(
        "or_({})",
        schemas
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let predicate = name.clone();
    Schema::leaf(name, move |value| {
        let mut failures = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            match validate(schema, value) {
                Ok(validated) => return Ok(validated),
                Err(e) => failures.push(format!("{}: {}", schema, e)),
            }
        }
        let message = format!("no alternative matched ({})", failures.join("; "));
        Err(ValidationError::rejected(
            predicate.clone(),
            value.clone(),
            Some(&message),
        ))
    })
}

/// Accepts only values equal to one of `values` (numbers compare by magnitude).
pub fn enum_(values: impl IntoIterator<Item = Value>) -> Schema {
    let values: Vec<Value> = values.into_iter().collect();
    let name = format!(
        "enum({})",
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    predicate_validator(
        name,
        move |value| values.iter().any(|v| loosely_equal(v, value)),
        None,
        None,
    )
}

/// Integers. Strings holding an integer and floats without a fractional part are coerced.
pub fn int() -> Schema {
    predicate_validator(
        "int",
        |value| value.is_i64() || value.is_u64(),
        Some(coercer(|value| {
            Ok(match value {
                Value::String(s) => match s.trim().parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => value.clone(),
                },
                Value::Number(n) if n.is_f64() => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e18 => Value::from(f as i64),
                    _ => value.clone(),
                },
                _ => value.clone(),
            })
        })),
        None,
    )
}

/// Any number. Strings holding a finite number are coerced.
pub fn float() -> Schema {
    predicate_validator(
        "float",
        Value::is_number,
        Some(coercer(|value| {
            Ok(value
                .as_str()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()))
        })),
        None,
    )
}

/// Strings. Anything else is coerced to its text; containers render as compact JSON.
pub fn string() -> Schema {
    predicate_validator(
        "str",
        Value::is_string,
        Some(coercer(|value| Ok(Value::String(to_plain_string(value))))),
        None,
    )
}

pub fn boolean() -> Schema {
    predicate_validator("bool", Value::is_boolean, None, None)
}

/// Accepts everything unchanged.
pub fn any() -> Schema {
    Schema::leaf("any", |value| Ok(value.clone()))
}

/// Schema used when a boundary has no schema of its own.
pub fn identity() -> Schema {
    Schema::leaf("identity", |value| Ok(value.clone()))
}
