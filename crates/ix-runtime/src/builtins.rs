use std::sync::Arc;

use ix_core::{ClassBuilder, ClassDescriptor, HostError, ParamType, Value};

/// Member tables for the container values every script can see.
pub(crate) struct BuiltinClasses {
    pub(crate) string: Arc<ClassDescriptor>,
    pub(crate) array: Arc<ClassDescriptor>,
    pub(crate) map: Arc<ClassDescriptor>,
}

impl BuiltinClasses {
    pub(crate) fn new() -> Self {
        Self {
            string: string_class(),
            array: array_class(),
            map: map_class(),
        }
    }

    pub(crate) fn class_of(&self, value: &Value) -> Option<Arc<ClassDescriptor>> {
        match value {
            Value::String(_) => Some(self.string.clone()),
            Value::Array(_) => Some(self.array.clone()),
            Value::Map(_) => Some(self.map.clone()),
            Value::Object(object) => Some(object.class()),
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => None,
        }
    }
}

fn text(value: &Value) -> Result<&str, HostError> {
    value
        .as_str()
        .ok_or_else(|| HostError::illegal_argument(format!("expected string, got {}", value.type_name())))
}

fn items(value: &Value) -> Result<&[Value], HostError> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(HostError::illegal_argument(format!(
            "expected array, got {}",
            other.type_name()
        ))),
    }
}

fn entries(value: &Value) -> Result<&std::collections::BTreeMap<String, Value>, HostError> {
    match value {
        Value::Map(values) => Ok(values),
        other => Err(HostError::illegal_argument(format!(
            "expected map, got {}",
            other.type_name()
        ))),
    }
}

fn index(value: &Value, len: usize) -> Result<usize, HostError> {
    let raw = value
        .as_int()
        .ok_or_else(|| HostError::illegal_argument("index must be an integer"))?;
    usize::try_from(raw)
        .ok()
        .filter(|index| *index <= len)
        .ok_or_else(|| HostError::runtime(format!("index {} out of range for length {}", raw, len)))
}

fn length(len: usize) -> Value {
    Value::Int(len as i64)
}

fn string_class() -> Arc<ClassDescriptor> {
    ClassBuilder::<Value>::new("String")
        .method("length", &[], |this, _| Ok(length(text(this)?.chars().count())))
        .method("size", &[], |this, _| Ok(length(text(this)?.chars().count())))
        .method("isEmpty", &[], |this, _| Ok(Value::Bool(text(this)?.is_empty())))
        .method("toUpperCase", &[], |this, _| Ok(Value::from(text(this)?.to_uppercase())))
        .method("toLowerCase", &[], |this, _| Ok(Value::from(text(this)?.to_lowercase())))
        .method("trim", &[], |this, _| Ok(Value::from(text(this)?.trim())))
        .method("contains", &[ParamType::String], |this, args| {
            Ok(Value::Bool(text(this)?.contains(text(&args[0])?)))
        })
        .method("startsWith", &[ParamType::String], |this, args| {
            Ok(Value::Bool(text(this)?.starts_with(text(&args[0])?)))
        })
        .method("endsWith", &[ParamType::String], |this, args| {
            Ok(Value::Bool(text(this)?.ends_with(text(&args[0])?)))
        })
        .method("charAt", &[ParamType::Integer], |this, args| {
            let chars = text(this)?.chars().collect::<Vec<_>>();
            let at = index(&args[0], chars.len())?;
            chars
                .get(at)
                .map(|ch| Value::from(ch.to_string()))
                .ok_or_else(|| HostError::runtime(format!("index {} out of range", at)))
        })
        .method("substring", &[ParamType::Integer], |this, args| {
            let chars = text(this)?.chars().collect::<Vec<_>>();
            let start = index(&args[0], chars.len())?;
            Ok(Value::from(chars[start..].iter().collect::<String>()))
        })
        .method(
            "substring",
            &[ParamType::Integer, ParamType::Integer],
            |this, args| {
                let chars = text(this)?.chars().collect::<Vec<_>>();
                let start = index(&args[0], chars.len())?;
                let end = index(&args[1], chars.len())?;
                if start > end {
                    return Err(HostError::runtime(format!(
                        "substring start {} is after end {}",
                        start, end
                    )));
                }
                Ok(Value::from(chars[start..end].iter().collect::<String>()))
            },
        )
        .variadic_method("concat", &[ParamType::Any], |this, args| {
            let mut out = text(this)?.to_string();
            for part in items(&args[0])? {
                out.push_str(&part.to_string());
            }
            Ok(Value::from(out))
        })
        .field("length", ParamType::Integer, |this| {
            this.as_str()
                .map(|value| length(value.chars().count()))
                .unwrap_or(Value::Null)
        })
        .build()
}

fn array_class() -> Arc<ClassDescriptor> {
    ClassBuilder::<Value>::new("Array")
        .method("size", &[], |this, _| Ok(length(items(this)?.len())))
        .method("isEmpty", &[], |this, _| Ok(Value::Bool(items(this)?.is_empty())))
        .method("get", &[ParamType::Integer], |this, args| {
            let values = items(this)?;
            let at = index(&args[0], values.len())?;
            values
                .get(at)
                .cloned()
                .ok_or_else(|| HostError::runtime(format!("index {} out of range", at)))
        })
        .method("contains", &[ParamType::Any], |this, args| {
            Ok(Value::Bool(items(this)?.contains(&args[0])))
        })
        .method("indexOf", &[ParamType::Any], |this, args| {
            Ok(items(this)?
                .iter()
                .position(|item| item == &args[0])
                .map(|at| Value::Int(at as i64))
                .unwrap_or(Value::Int(-1)))
        })
        .field("length", ParamType::Integer, |this| match this {
            Value::Array(values) => length(values.len()),
            _ => Value::Null,
        })
        .build()
}

fn map_class() -> Arc<ClassDescriptor> {
    ClassBuilder::<Value>::new("Map")
        .method("size", &[], |this, _| Ok(length(entries(this)?.len())))
        .method("isEmpty", &[], |this, _| Ok(Value::Bool(entries(this)?.is_empty())))
        .method("containsKey", &[ParamType::String], |this, args| {
            Ok(Value::Bool(entries(this)?.contains_key(text(&args[0])?)))
        })
        .method("get", &[ParamType::String], |this, args| {
            Ok(entries(this)?
                .get(text(&args[0])?)
                .cloned()
                .unwrap_or(Value::Null))
        })
        .method("keys", &[], |this, _| {
            Ok(Value::Array(
                entries(this)?.keys().cloned().map(Value::String).collect(),
            ))
        })
        .method("values", &[], |this, _| {
            Ok(Value::Array(entries(this)?.values().cloned().collect()))
        })
        .build()
}
