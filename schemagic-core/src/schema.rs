//! Schemas are plain data: sequences, mappings and leaf functions, interpreted by shape.
//!
//! | written as                  | shape             | matches                                  |
//! |-----------------------------|-------------------|------------------------------------------|
//! | `[s]`                       | sequence template | sequence of any length, every item `s`   |
//! | `[s1, s2, ...]`             | strict sequence   | sequence of the same length, positional  |
//! | `{K: V}` with `K` a schema  | map template      | mapping, every key `K` and value `V`     |
//! | `{"name": s, ...}`          | keyed mapping     | mapping containing at least those keys   |
//! | `f`                         | leaf              | whatever `f` accepts                     |

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::into_validation_error::IntoValidationError;
use crate::ValidationError;

/// Leaf function: returns the (possibly coerced) value or fails.
pub type LeafFn = dyn Fn(&Value) -> Result<Value, ValidationError> + Send + Sync;

/// Named leaf function. The name is what the schema prints as.
#[derive(Clone)]
pub struct Leaf {
    name: String,
    f: Arc<LeafFn>,
}

impl Leaf {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, value: &Value) -> Result<Value, ValidationError> {
        (self.f)(value)
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Leaf").field(&self.name).finish()
    }
}

/// Key of a mapping schema: a plain name (keyed mapping) or a schema (map template).
#[derive(Clone, Debug)]
pub enum SchemaKey {
    Name(String),
    Schema(Schema),
}

#[derive(Clone, Debug)]
pub enum Schema {
    Leaf(Leaf),
    Sequence(Vec<Schema>),
    Mapping(Vec<(SchemaKey, Schema)>),
}

/// One of the five shapes a schema node is classified into.
#[derive(Debug)]
pub enum SchemaShape<'a> {
    SequenceTemplate(&'a Schema),
    StrictSequence(&'a [Schema]),
    MapTemplate { key: &'a Schema, value: &'a Schema },
    KeyedMapping(Vec<(&'a str, &'a Schema)>),
    Leaf(&'a Leaf),
}

impl Schema {
    pub fn leaf(
        name: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    ) -> Self {
        Schema::Leaf(Leaf::new(name, f))
    }

    /// Leaf from a closure with a foreign error type; its errors become rejections naming the leaf.
    pub fn try_leaf<E>(
        name: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
    ) -> Self
    where
        E: std::error::Error,
    {
        let name = name.into();
        let predicate = name.clone();
        Schema::leaf(name, move |value| {
            f(value).map_err(|e| e.into_validation_error(&predicate, value))
        })
    }

    pub fn keyed<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Schema::Mapping(
            entries
                .into_iter()
                .map(|(k, s)| (SchemaKey::Name(k.into()), s))
                .collect(),
        )
    }

    pub fn map_template(key: impl Into<Schema>, value: impl Into<Schema>) -> Self {
        Schema::Mapping(vec![(SchemaKey::Schema(key.into()), value.into())])
    }

    /// Classify this node. Precedence: sequence template, strict sequence, map template,
    /// keyed mapping, leaf.
    pub fn shape(&self) -> Result<SchemaShape<'_>, ValidationError> {
        match self {
            Schema::Sequence(items) => match items.as_slice() {
                [] => Err(ValidationError::Classification(
                    "empty sequence schema".into(),
                )),
                [inner] => Ok(SchemaShape::SequenceTemplate(inner)),
                many => Ok(SchemaShape::StrictSequence(many)),
            },
            Schema::Mapping(entries) => classify_mapping(entries),
            Schema::Leaf(leaf) => Ok(SchemaShape::Leaf(leaf)),
        }
    }
}

fn classify_mapping(entries: &[(SchemaKey, Schema)]) -> Result<SchemaShape<'_>, ValidationError> {
    if let [(SchemaKey::Schema(key), value)] = entries {
        return Ok(SchemaShape::MapTemplate { key, value });
    }
    let mut seen = HashSet::new();
    let mut keyed = Vec::with_capacity(entries.len());
    for (key, schema) in entries {
        match key {
            SchemaKey::Name(name) => {
                if !seen.insert(name.as_str()) {
                    return Err(ValidationError::Classification(format!(
                        "duplicate key {:?} in keyed mapping",
                        name
                    )));
                }
                keyed.push((name.as_str(), schema));
            }
            SchemaKey::Schema(key) => {
                return Err(ValidationError::Classification(format!(
                    "map template key {} must be the only entry of its mapping ({} entries)",
                    key,
                    entries.len()
                )));
            }
        }
    }
    Ok(SchemaShape::KeyedMapping(keyed))
}

impl From<Leaf> for Schema {
    fn from(leaf: Leaf) -> Self {
        Schema::Leaf(leaf)
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(items: Vec<Schema>) -> Self {
        Schema::Sequence(items)
    }
}

impl<const N: usize> From<[Schema; N]> for Schema {
    fn from(items: [Schema; N]) -> Self {
        Schema::Sequence(items.into())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Leaf(leaf) => write!(f, "{}", leaf.name),
            Schema::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Schema::Mapping(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match key {
                        SchemaKey::Name(name) => write!(f, "{:?}: {}", name, value)?,
                        SchemaKey::Schema(key) => write!(f, "{}: {}", key, value)?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

/// Write schemas as literals.
///
/// ```
/// use schemagic_core::schema;
/// use schemagic_core::validators::{int, string};
///
/// let ids = schema!([int()]);
/// let pair = schema!([int(), string()]);
/// let person = schema!({"name" => string(), "tags" => schema!([string()])});
/// let lookup = schema!({[int()] => string()});
/// assert_eq!(lookup.to_string(), "{int: str}");
/// # let _ = (ids, pair, person);
/// ```
#[macro_export]
macro_rules! schema {
    ([$($item:expr),+ $(,)?]) => {
        $crate::Schema::Sequence(vec![$($crate::Schema::from($item)),+])
    };
    ({[$key:expr] => $value:expr $(,)?}) => {
        $crate::Schema::map_template($key, $value)
    };
    ({$($name:literal => $value:expr),+ $(,)?}) => {
        $crate::Schema::keyed([$(($name, $crate::Schema::from($value))),+])
    };
}
