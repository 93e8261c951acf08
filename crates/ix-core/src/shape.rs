use std::fmt;

use crate::class::ClassId;
use crate::value::Value;

/// Structural identity of a value, used as the dispatch cache key.
///
/// Host objects are keyed by their class descriptor id, not their nominal
/// name, so two classes called `Point` with different members never share
/// a cached binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Map,
    Object(ClassId),
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Int(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Map(_) => Self::Map,
            Value::Object(object) => Self::Object(object.class().id()),
        }
    }

    pub fn of_all(values: &[Value]) -> Vec<Self> {
        values.iter().map(Self::of).collect()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool => f.write_str("boolean"),
            Self::Int => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Array => f.write_str("array"),
            Self::Map => f.write_str("map"),
            Self::Object(id) => write!(f, "object{}", id),
        }
    }
}
