//! Shapes of values, as seen by the type checker.

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// Abstract shape of a [`Value`].
///
/// Built from a representative example with [`Schema::of`]; the example itself
/// is never referenced afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Nothing is known (`null`, or the items of an empty array)
    Unknown,
    Boolean,
    Number,
    String,
    /// Array whose items look like the first item of the example
    Array(Box<Schema>),
    Object(IndexMap<String, Schema>),
}

impl Schema {
    /// Classifies an example value recursively.
    ///
    /// ```
    /// use mexpr::{Schema, Value};
    ///
    /// let items = Value::Array(vec![Value::Number(1.0), Value::from("mixed")]);
    /// assert_eq!(Schema::of(&items), Schema::Array(Box::new(Schema::Number)));
    /// assert_eq!(Schema::of(&Value::Array(vec![])), Schema::Array(Box::new(Schema::Unknown)));
    /// ```
    pub fn of(value: &Value) -> Schema {
        match value {
            Value::Null => Schema::Unknown,
            Value::Boolean(_) => Schema::Boolean,
            Value::Number(_) => Schema::Number,
            Value::String(_) => Schema::String,
            Value::Array(items) => {
                let item = items.first().map_or(Schema::Unknown, Schema::of);
                Schema::Array(Box::new(item))
            }
            Value::Object(map) => Schema::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Schema::of(value)))
                    .collect(),
            ),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Unknown => "unknown",
            Schema::Boolean => "boolean",
            Schema::Number => "number",
            Schema::String => "string",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Schema::Unknown)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Schema::Number)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Schema::String)
    }

    /// Item schema of an array; `None` for every other shape.
    pub fn items(&self) -> Option<&Schema> {
        match self {
            Schema::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        match self {
            Schema::Object(properties) => properties.get(name),
            _ => None,
        }
    }
}

impl fmt::Display for Schema {
    /// Objects render with their key list, which is what "no property"
    /// diagnostics need.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Array(items) => write!(f, "array of {}", items),
            Schema::Object(properties) => {
                let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
                write!(f, "object with keys [{}]", keys.join(", "))
            }
            other => f.write_str(other.type_name()),
        }
    }
}
