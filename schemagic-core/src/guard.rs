//! Boundary validation: validators with subject context, and guards that wrap a function
//! with an input and an output validator.
//!
//! Arguments are packed into one value before input validation:
//!
//! | positional | keyword | packed as                             |
//! |------------|---------|---------------------------------------|
//! | any (>0)   | yes     | strict sequence `[p1, ..., pn, {kw}]` |
//! | none       | yes     | the keyword mapping                   |
//! | 2 or more  | no      | sequence of the positionals           |
//! | exactly 1  | no      | the single value itself               |
//! | none       | no      | nothing; input validation is not run  |
//!
//! The validated value is unpacked the same way before the function is called.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::ValidationConfig;
use crate::dispatch::Dispatcher;
use crate::matchers::validate;
use crate::schema::Schema;
use crate::validators::identity;
use crate::ValidationError;

/// Zero-argument predicate deciding, per call, whether validation runs.
pub type ValidationPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Input,
    Output,
}

/// Positional and keyword arguments of a guarded call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keyword: Map<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keyword: Map::new(),
        }
    }

    pub fn from_keyword(keyword: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keyword,
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// How a call's arguments were packed into a single value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Packing {
    Mixed,
    Keyword,
    Positional,
    Single,
    Empty,
}

#[derive(Debug)]
struct Packed {
    packing: Packing,
    value: Value,
}

fn packer() -> Dispatcher<Args, Packed> {
    Dispatcher::<Args, Packed>::new()
        .when(
            |args| !args.positional.is_empty() && !args.keyword.is_empty(),
            |args| {
                let mut items = args.positional;
                items.push(Value::Object(args.keyword));
                Packed {
                    packing: Packing::Mixed,
                    value: Value::Array(items),
                }
            },
        )
        .when(
            |args| !args.keyword.is_empty(),
            |args| Packed {
                packing: Packing::Keyword,
                value: Value::Object(args.keyword),
            },
        )
        .when(
            |args| args.positional.len() > 1,
            |args| Packed {
                packing: Packing::Positional,
                value: Value::Array(args.positional),
            },
        )
        .when(
            |args| args.positional.len() == 1,
            |mut args| Packed {
                packing: Packing::Single,
                value: args.positional.pop().unwrap_or_default(),
            },
        )
        .otherwise(|_| Packed {
            packing: Packing::Empty,
            value: Value::Null,
        })
}

impl Packing {
    /// Recover arguments from a (validated) packed value.
    pub fn unpack(self, value: Value) -> Result<Args, ValidationError> {
        match (self, value) {
            (Packing::Mixed, Value::Array(mut items)) => match items.pop() {
                Some(Value::Object(keyword)) => Ok(Args {
                    positional: items,
                    keyword,
                }),
                Some(last) => {
                    items.push(last);
                    Err(ValidationError::type_mismatch(
                        "sequence ending in a keyword mapping",
                        &Value::Array(items),
                    ))
                }
                None => Err(ValidationError::type_mismatch(
                    "sequence ending in a keyword mapping",
                    &Value::Array(items),
                )),
            },
            (Packing::Keyword, Value::Object(keyword)) => Ok(Args::from_keyword(keyword)),
            (Packing::Positional, Value::Array(items)) => Ok(Args::from_positional(items)),
            (Packing::Single, value) => Ok(Args::from_positional([value])),
            (Packing::Empty, _) => Ok(Args::new()),
            (Packing::Mixed, other) => Err(ValidationError::type_mismatch(
                "sequence ending in a keyword mapping",
                &other,
            )),
            (Packing::Keyword, other) => Err(ValidationError::type_mismatch("mapping", &other)),
            (Packing::Positional, other) => {
                Err(ValidationError::type_mismatch("sequence", &other))
            }
        }
    }
}

/// Validates one side of a boundary and tags failures with the subject they concern.
#[derive(Clone)]
pub struct Validator {
    schema: Schema,
    subject: String,
    side: Side,
    coerce: bool,
    when: ValidationPredicate,
}

impl Validator {
    /// Validator that always runs and returns the original value on success.
    /// Without a schema every value is accepted.
    pub fn new(schema: Option<Schema>, subject: impl Into<String>, side: Side) -> Self {
        Self {
            schema: schema.unwrap_or_else(identity),
            subject: subject.into(),
            side,
            coerce: false,
            when: Arc::new(|| true),
        }
    }

    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn validate_when(mut self, predicate: ValidationPredicate) -> Self {
        self.when = predicate;
        self
    }

    pub fn config(self, config: &ValidationConfig) -> Self {
        self.coerce(config.coerce).validate_when(config.predicate())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Validate `value` unless the predicate says to skip. Returns the coerced value when
    /// coercion is on, otherwise the original.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        if !(self.when)() {
            tracing::debug!(subject = %self.subject, "validation skipped");
            return Ok(value);
        }
        self.apply(value)
    }

    /// Validate regardless of the predicate.
    pub fn apply(&self, value: Value) -> Result<Value, ValidationError> {
        match validate(&self.schema, &value) {
            Ok(validated) if self.coerce => Ok(validated),
            Ok(_) => Ok(value),
            Err(e) => Err(self.wrap(e, value)),
        }
    }

    /// Attach this validator's subject, side and schema to `source`.
    pub fn wrap(&self, source: ValidationError, value: Value) -> ValidationError {
        tracing::debug!(subject = %self.subject, side = ?self.side, error = %source, "boundary validation failed");
        let subject = self.subject.clone();
        let schema = self.schema.to_string();
        let source = Box::new(source);
        match self.side {
            Side::Input => ValidationError::InputBoundary {
                subject,
                schema,
                value,
                source,
            },
            Side::Output => ValidationError::OutputBoundary {
                subject,
                schema,
                value,
                source,
            },
        }
    }
}

/// A function wrapped with input and output validation.
///
/// The function's own errors are returned unchanged; validation failures are converted into `E`.
pub struct Guard<F> {
    name: String,
    input: Validator,
    output: Validator,
    when: ValidationPredicate,
    packer: Dispatcher<Args, Packed>,
    f: F,
}

impl<F> Guard<F> {
    /// Guard without schemas: validates nothing until `input`/`output` are set. Coercion is on.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        let name = name.into();
        Self {
            input: Validator::new(None, format!("input to function {}", name), Side::Input)
                .coerce(true),
            output: Validator::new(None, format!("output from function {}", name), Side::Output)
                .coerce(true),
            name,
            when: Arc::new(|| true),
            packer: packer(),
            f,
        }
    }

    pub fn input(mut self, schema: impl Into<Schema>) -> Self {
        self.input.schema = schema.into();
        self
    }

    pub fn output(mut self, schema: impl Into<Schema>) -> Self {
        self.output.schema = schema.into();
        self
    }

    pub fn coerce(mut self, coerce: bool) -> Self {
        self.input.coerce = coerce;
        self.output.coerce = coerce;
        self
    }

    pub fn validate_when(mut self, predicate: ValidationPredicate) -> Self {
        self.when = predicate;
        self
    }

    pub fn config(self, config: &ValidationConfig) -> Self {
        self.coerce(config.coerce).validate_when(config.predicate())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn validate_input(&self, args: Args) -> Result<Args, ValidationError> {
        let Packed { packing, value } = self.packer.dispatch(args)?;
        if packing == Packing::Empty {
            return Ok(Args::new());
        }
        let forwarded = self.input.apply(value)?;
        packing
            .unpack(forwarded.clone())
            .map_err(|e| self.input.wrap(e, forwarded))
    }
}

impl<F, E> Guard<F>
where
    F: Fn(Args) -> Result<Value, E>,
    E: From<ValidationError>,
{
    pub fn call(&self, args: Args) -> Result<Value, E> {
        if !(self.when)() {
            tracing::debug!(function = %self.name, "validation skipped");
            return (self.f)(args);
        }
        let args = self.validate_input(args)?;
        let result = (self.f)(args)?;
        Ok(self.output.apply(result)?)
    }
}

/// Wrap `f` so calls are validated against `input` and results against `output`.
/// `predicate` (default: always) is evaluated on every call; when it returns false the
/// function runs with its original arguments and nothing is validated.
pub fn guard<F>(
    name: impl Into<String>,
    input: Option<Schema>,
    output: Option<Schema>,
    predicate: Option<ValidationPredicate>,
    coerce: bool,
    f: F,
) -> Guard<F> {
    let mut guarded = Guard::new(name, f).coerce(coerce);
    if let Some(schema) = input {
        guarded = guarded.input(schema);
    }
    if let Some(schema) = output {
        guarded = guarded.output(schema);
    }
    if let Some(predicate) = predicate {
        guarded = guarded.validate_when(predicate);
    }
    guarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pack(args: Args) -> Packed {
        packer().dispatch(args).unwrap()
    }

    #[test]
    fn packing_follows_the_table() {
        let mixed = pack(Args::new().arg(1).kwarg("a", 2));
        assert_eq!(mixed.packing, Packing::Mixed);
        assert_eq!(mixed.value, json!([1, {"a": 2}]));

        let keyword = pack(Args::new().kwarg("a", 2));
        assert_eq!(keyword.packing, Packing::Keyword);
        assert_eq!(keyword.value, json!({"a": 2}));

        let positional = pack(Args::new().arg(1).arg(2));
        assert_eq!(positional.packing, Packing::Positional);
        assert_eq!(positional.value, json!([1, 2]));

        let single = pack(Args::new().arg(json!([1, 2])));
        assert_eq!(single.packing, Packing::Single);
        assert_eq!(single.value, json!([1, 2]));

        assert_eq!(pack(Args::new()).packing, Packing::Empty);
    }

    #[test]
    fn unpack_mirrors_pack() {
        let args = Args::new().arg(1).arg("x").kwarg("k", true);
        let Packed { packing, value } = pack(args.clone());
        assert_eq!(packing.unpack(value).unwrap(), args);

        let single = Args::new().arg(json!({"a": 1}));
        let Packed { packing, value } = pack(single.clone());
        assert_eq!(packing.unpack(value).unwrap(), single);
    }

    #[test]
    fn unpack_rejects_reshaped_values() {
        assert!(Packing::Mixed.unpack(json!([1, 2])).is_err());
        assert!(Packing::Keyword.unpack(json!([1])).is_err());
        assert!(Packing::Positional.unpack(json!({"a": 1})).is_err());
    }
}
