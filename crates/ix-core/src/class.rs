//! Host type metadata: the member tables scripts are resolved against.
//!
//! A [`ClassDescriptor`] plays the role reflection plays on managed
//! platforms. It lists methods in declaration order, fields, and an optional
//! iteration hook. Each descriptor gets a process-unique [`ClassId`], so two
//! descriptors that share a nominal name are still distinct runtime shapes.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::HostError;
use crate::value::{HostObject, Value};

pub type NativeMethod = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync>;
pub type FieldReader = Arc<dyn Fn(&Value) -> Result<Value, HostError> + Send + Sync>;
pub type FieldWriter = Arc<dyn Fn(&Value, Value) -> Result<(), HostError> + Send + Sync>;
pub type IterationHook = Arc<dyn Fn(&Value) -> Result<HostSequence, HostError> + Send + Sync>;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declared parameter or field type used for assignability and best-fit matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Any,
    Number,
    Integer,
    Float,
    Bool,
    String,
    Array,
    Map,
    Object,
    Class(String),
}

impl ParamType {
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Number, Value::Int(_) | Value::Float(_)) => true,
            (Self::Integer, Value::Int(_)) => true,
            (Self::Float, Value::Int(_) | Value::Float(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Map, Value::Map(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            (Self::Class(name), Value::Object(object)) => object.class().name() == name,
            (Self::String | Self::Array | Self::Map | Self::Object | Self::Class(_), Value::Null) => {
                true
            }
            _ => false,
        }
    }

    /// Reflexive subtype check: `Integer <: Float <: Number <: Any`,
    /// `Class(_) <: Object <: Any`, everything `<: Any`.
    pub fn is_subtype_of(&self, other: &ParamType) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (_, Self::Any) => true,
            (Self::Integer, Self::Float | Self::Number) => true,
            (Self::Float, Self::Number) => true,
            (Self::Class(_), Self::Object) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Number => f.write_str("Number"),
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::Bool => f.write_str("Bool"),
            Self::String => f.write_str("String"),
            Self::Array => f.write_str("Array"),
            Self::Map => f.write_str("Map"),
            Self::Object => f.write_str("Object"),
            Self::Class(name) => f.write_str(name),
        }
    }
}

pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParamType>,
    /// The last parameter absorbs any number of trailing arguments.
    pub variadic: bool,
    /// Position in the declaring class; lower wins ties.
    pub index: usize,
    pub func: NativeMethod,
}

impl MethodDescriptor {
    pub fn signature(&self) -> String {
        let mut params = self
            .params
            .iter()
            .map(ParamType::to_string)
            .collect::<Vec<_>>();
        if self.variadic {
            if let Some(last) = params.last_mut() {
                last.push_str("...");
            }
        }
        format!("{}({})", self.name, params.join(", "))
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("signature", &self.signature())
            .field("index", &self.index)
            .finish()
    }
}

pub struct FieldDescriptor {
    pub name: String,
    pub ty: ParamType,
    pub read: FieldReader,
    pub write: Option<FieldWriter>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("writable", &self.write.is_some())
            .finish()
    }
}

/// A lazily produced sequence handed out by an iteration hook.
pub struct HostSequence {
    pub items: Box<dyn Iterator<Item = Value> + Send>,
    pub release: Option<Box<dyn FnOnce() + Send>>,
}

impl HostSequence {
    pub fn new(items: impl Iterator<Item = Value> + Send + 'static) -> Self {
        Self {
            items: Box::new(items),
            release: None,
        }
    }

    pub fn on_release(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }
}

pub struct ClassDescriptor {
    id: ClassId,
    name: String,
    methods: Vec<Arc<MethodDescriptor>>,
    fields: Vec<Arc<FieldDescriptor>>,
    iterate: Option<IterationHook>,
}

impl ClassDescriptor {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    pub fn iteration_hook(&self) -> Option<&IterationHook> {
        self.iterate.as_ref()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("fields", &self.fields)
            .field("iterable", &self.iterate.is_some())
            .finish()
    }
}

/// Extracts the typed receiver a class member operates on.
pub trait Receiver: 'static {
    fn extract(value: &Value) -> Option<&Self>;
}

impl Receiver for Value {
    fn extract(value: &Value) -> Option<&Self> {
        Some(value)
    }
}

impl<T: HostObject + 'static> Receiver for T {
    fn extract(value: &Value) -> Option<&Self> {
        match value {
            Value::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

fn receiver<'a, T: Receiver>(class: &str, value: &'a Value) -> Result<&'a T, HostError> {
    T::extract(value).ok_or_else(|| {
        HostError::illegal_argument(format!(
            "receiver of type {} is not a {}",
            value.type_name(),
            class
        ))
    })
}

pub struct ClassBuilder<T> {
    name: String,
    methods: Vec<Arc<MethodDescriptor>>,
    fields: Vec<Arc<FieldDescriptor>>,
    iterate: Option<IterationHook>,
    _receiver: PhantomData<fn() -> T>,
}

impl<T: Receiver> ClassBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            fields: Vec::new(),
            iterate: None,
            _receiver: PhantomData,
        }
    }

    pub fn method<F>(self, name: &str, params: &[ParamType], func: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.push_method(name, params, false, func)
    }

    /// Declares a method whose last parameter collects the trailing arguments
    /// into an array.
    pub fn variadic_method<F>(self, name: &str, params: &[ParamType], func: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.push_method(name, params, !params.is_empty(), func)
    }

    fn push_method<F>(mut self, name: &str, params: &[ParamType], variadic: bool, func: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let class = self.name.clone();
        let func: NativeMethod = Arc::new(move |value: &Value, args: &[Value]| {
            func(receiver::<T>(&class, value)?, args)
        });
        let index = self.methods.len();
        self.methods.push(Arc::new(MethodDescriptor {
            name: name.to_string(),
            params: params.to_vec(),
            variadic,
            index,
            func,
        }));
        self
    }

    pub fn field<R>(mut self, name: &str, ty: ParamType, read: R) -> Self
    where
        R: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let class = self.name.clone();
        let read: FieldReader =
            Arc::new(move |value: &Value| Ok(read(receiver::<T>(&class, value)?)));
        self.fields.push(Arc::new(FieldDescriptor {
            name: name.to_string(),
            ty,
            read,
            write: None,
        }));
        self
    }

    pub fn mutable_field<R, W>(mut self, name: &str, ty: ParamType, read: R, write: W) -> Self
    where
        R: Fn(&T) -> Value + Send + Sync + 'static,
        W: Fn(&T, Value) -> Result<(), HostError> + Send + Sync + 'static,
    {
        let read_class = self.name.clone();
        let write_class = self.name.clone();
        let read: FieldReader =
            Arc::new(move |value: &Value| Ok(read(receiver::<T>(&read_class, value)?)));
        let write: FieldWriter = Arc::new(move |value: &Value, new_value: Value| {
            write(receiver::<T>(&write_class, value)?, new_value)
        });
        self.fields.push(Arc::new(FieldDescriptor {
            name: name.to_string(),
            ty,
            read,
            write: Some(write),
        }));
        self
    }

    pub fn iterable<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) -> Result<HostSequence, HostError> + Send + Sync + 'static,
    {
        let class = self.name.clone();
        self.iterate = Some(Arc::new(move |value: &Value| {
            hook(receiver::<T>(&class, value)?)
        }));
        self
    }

    pub fn build(self) -> Arc<ClassDescriptor> {
        Arc::new(ClassDescriptor {
            id: ClassId::next(),
            name: self.name,
            methods: self.methods,
            fields: self.fields,
            iterate: self.iterate,
        })
    }
}
