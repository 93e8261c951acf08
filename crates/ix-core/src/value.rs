use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::class::ClassDescriptor;
use crate::shape::Shape;

/// A value owned by the embedding application and exposed to scripts.
///
/// Implementors usually keep mutable state behind a lock, since every
/// script-visible mutation goes through `&self`.
pub trait HostObject: Send + Sync + fmt::Debug {
    fn class(&self) -> Arc<ClassDescriptor>;
    fn as_any(&self) -> &dyn Any;
}

pub type HostRef = Arc<dyn HostObject>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(HostRef),
}

impl Value {
    pub fn object<T: HostObject + 'static>(object: T) -> Self {
        Self::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::of(self)
    }

    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "boolean".to_string(),
            Self::Int(_) => "integer".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Array(_) => "array".to_string(),
            Self::Map(_) => "map".to_string(),
            Self::Object(object) => object.class().name().to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => left == right,
            (Self::Map(left), Self::Map(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => {
                if value.fract().abs() < f64::EPSILON && value.is_finite() {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Self::String(value) => f.write_str(value),
            Self::Array(values) => {
                let parts = values.iter().map(Value::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(values) => {
                let parts = values
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Object(object) => write!(f, "{}@{}", object.class().name(), object.class().id()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self::Map(values)
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;
    use crate::class::ClassBuilder;

    #[derive(Debug)]
    struct Probe {
        class: Arc<ClassDescriptor>,
    }

    impl HostObject for Probe {
        fn class(&self) -> Arc<ClassDescriptor> {
            self.class.clone()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn objects_compare_by_identity() {
        let class = ClassBuilder::<Probe>::new("Probe").build();
        let first = Value::object(Probe {
            class: class.clone(),
        });
        let second = Value::object(Probe { class });
        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_eq!(first.type_name(), "Probe");
    }

    #[test]
    fn numeric_accessors_widen_ints() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_int(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn display_renders_nested_containers() {
        let value = Value::Map(BTreeMap::from([(
            "k".to_string(),
            Value::Array(vec![Value::Int(1), Value::Float(2.0), Value::Null]),
        )]));
        assert_eq!(value.to_string(), "{k: [1, 2.0, null]}");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }
}
