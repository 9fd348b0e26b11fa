//! Recursive validation: classify the schema node, then run the matcher for its shape.
//! Children are validated through `validate` again, never through a matcher directly.

use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaShape};
use crate::value::into_key;
use crate::ValidationError;

/// Validate `value` against `schema`, returning the coerced value.
///
/// The first failing child aborts the walk; missing keys of a keyed mapping are reported together.
pub fn validate(schema: &Schema, value: &Value) -> Result<Value, ValidationError> {
    match schema.shape()? {
        SchemaShape::SequenceTemplate(inner) => validate_sequence_template(inner, value),
        SchemaShape::StrictSequence(items) => validate_strict_sequence(items, value),
        SchemaShape::MapTemplate {
            key,
            value: value_schema,
        } => validate_map_template(key, value_schema, value),
        SchemaShape::KeyedMapping(fields) => validate_keyed_mapping(&fields, value),
        SchemaShape::Leaf(leaf) => leaf.apply(value),
    }
}

fn validate_map_template(
    key_schema: &Schema,
    value_schema: &Schema,
    value: &Value,
) -> Result<Value, ValidationError> {
    let entries = value
        .as_object()
        .ok_or_else(|| ValidationError::type_mismatch("mapping", value))?;
    let mut out = Map::new();
    for (k, v) in entries {
        let key = validate(key_schema, &Value::String(k.clone()))?;
        let val = validate(value_schema, v)?;
        out.insert(into_key(key)?, val);
    }
    Ok(Value::Object(out))
}

fn validate_keyed_mapping(
    fields: &[(&str, &Schema)],
    value: &Value,
) -> Result<Value, ValidationError> {
    let entries = value
        .as_object()
        .ok_or_else(|| ValidationError::type_mismatch("mapping", value))?;
    let missing: Vec<String> = fields
        .iter()
        .filter(|(name, _)| !entries.contains_key(*name))
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingKeys {
            keys: missing,
            value: value.clone(),
        });
    }
    let mut out = entries.clone();
    for (name, schema) in fields {
        let validated = validate(schema, &entries[*name])?;
        out.insert(name.to_string(), validated);
    }
    Ok(Value::Object(out))
}

fn validate_sequence_template(inner: &Schema, value: &Value) -> Result<Value, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::type_mismatch("sequence", value))?;
    items
        .iter()
        .map(|item| validate(inner, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn validate_strict_sequence(schemas: &[Schema], value: &Value) -> Result<Value, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::type_mismatch("sequence", value))?;
    if items.len() != schemas.len() {
        return Err(ValidationError::LengthMismatch {
            expected: schemas.len(),
            found: items.len(),
        });
    }
    schemas
        .iter()
        .zip(items)
        .map(|(schema, item)| validate(schema, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
