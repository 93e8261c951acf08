//! Resolved, reusable bindings for one operation on one runtime shape.
//!
//! A handle is only valid for values of the shape it was resolved against.
//! Every `invoke` re-checks the receiver shape and rejects a mismatch with
//! `RESOLVE_SHAPE_MISMATCH` instead of calling into the wrong member.

use std::fmt;
use std::sync::Arc;

use ix_core::error::RESOLVE_SHAPE_MISMATCH;
use ix_core::{
    CallSiteInfo, FieldDescriptor, HostError, HostErrorKind, IxError, MethodDescriptor, Shape,
    Value,
};

use crate::overload::{is_applicable, pack_arguments};

fn check_shape(expected: Shape, value: &Value, operation: &str, site: &CallSiteInfo) -> Result<(), IxError> {
    let actual = Shape::of(value);
    if actual == expected {
        return Ok(());
    }
    Err(IxError::resolution(
        RESOLVE_SHAPE_MISMATCH,
        format!(
            "`{}` was resolved for {} but invoked on {}",
            operation, expected, actual
        ),
        site,
    ))
}

#[derive(Clone)]
enum GetterTarget {
    Accessor(Arc<MethodDescriptor>),
    Indexed {
        method: Arc<MethodDescriptor>,
        key: String,
    },
    Field(Arc<FieldDescriptor>),
}

#[derive(Clone)]
pub struct Getter {
    shape: Shape,
    target: GetterTarget,
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("shape", &self.shape)
            .field("target", &self.describe())
            .finish()
    }
}

impl Getter {
    pub(crate) fn accessor(shape: Shape, method: Arc<MethodDescriptor>) -> Self {
        Self {
            shape,
            target: GetterTarget::Accessor(method),
        }
    }

    pub(crate) fn indexed(shape: Shape, method: Arc<MethodDescriptor>, key: &str) -> Self {
        Self {
            shape,
            target: GetterTarget::Indexed {
                method,
                key: key.to_string(),
            },
        }
    }

    pub(crate) fn field(shape: Shape, field: Arc<FieldDescriptor>) -> Self {
        Self {
            shape,
            target: GetterTarget::Field(field),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn describe(&self) -> String {
        match &self.target {
            GetterTarget::Accessor(method) => format!("{}()", method.name),
            GetterTarget::Indexed { method, key } => format!("{}(\"{}\")", method.name, key),
            GetterTarget::Field(field) => field.name.clone(),
        }
    }

    pub fn invoke(&self, value: &Value, site: &CallSiteInfo) -> Result<Value, IxError> {
        check_shape(self.shape, value, &self.describe(), site)?;
        let result = match &self.target {
            GetterTarget::Accessor(method) => (method.func)(value, &pack_arguments(method, &[])),
            GetterTarget::Indexed { method, key } => {
                let args = [Value::String(key.clone())];
                (method.func)(value, &pack_arguments(method, &args))
            }
            GetterTarget::Field(field) => (field.read)(value),
        };
        result.map_err(|cause| IxError::invocation(self.describe(), site, cause))
    }
}

#[derive(Clone)]
enum SetterTarget {
    Mutator(Arc<MethodDescriptor>),
    Indexed {
        method: Arc<MethodDescriptor>,
        key: String,
    },
    Field(Arc<FieldDescriptor>),
}

#[derive(Clone)]
pub struct Setter {
    shape: Shape,
    target: SetterTarget,
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("shape", &self.shape)
            .field("target", &self.describe())
            .finish()
    }
}

impl Setter {
    pub(crate) fn mutator(shape: Shape, method: Arc<MethodDescriptor>) -> Self {
        Self {
            shape,
            target: SetterTarget::Mutator(method),
        }
    }

    pub(crate) fn indexed(shape: Shape, method: Arc<MethodDescriptor>, key: &str) -> Self {
        Self {
            shape,
            target: SetterTarget::Indexed {
                method,
                key: key.to_string(),
            },
        }
    }

    pub(crate) fn field(shape: Shape, field: Arc<FieldDescriptor>) -> Self {
        Self {
            shape,
            target: SetterTarget::Field(field),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn describe(&self) -> String {
        match &self.target {
            SetterTarget::Mutator(method) => format!("{}(_)", method.name),
            SetterTarget::Indexed { method, key } => format!("{}(\"{}\", _)", method.name, key),
            SetterTarget::Field(field) => field.name.clone(),
        }
    }

    fn accepts(&self, new_value: &Value) -> bool {
        match &self.target {
            SetterTarget::Mutator(method) => is_applicable(method, std::slice::from_ref(new_value)),
            SetterTarget::Indexed { method, key } => {
                is_applicable(method, &[Value::String(key.clone()), new_value.clone()])
            }
            SetterTarget::Field(field) => field.ty.accepts(new_value),
        }
    }

    pub fn invoke(&self, value: &Value, new_value: Value, site: &CallSiteInfo) -> Result<(), IxError> {
        check_shape(self.shape, value, &self.describe(), site)?;
        if !self.accepts(&new_value) {
            return Err(IxError::resolution(
                RESOLVE_SHAPE_MISMATCH,
                format!(
                    "`{}` does not accept a {} value",
                    self.describe(),
                    new_value.type_name()
                ),
                site,
            ));
        }
        let result = match &self.target {
            SetterTarget::Mutator(method) => {
                (method.func)(value, &pack_arguments(method, &[new_value])).map(|_| ())
            }
            SetterTarget::Indexed { method, key } => {
                let args = [Value::String(key.clone()), new_value];
                (method.func)(value, &pack_arguments(method, &args)).map(|_| ())
            }
            SetterTarget::Field(field) => match &field.write {
                Some(write) => write(value, new_value),
                None => Err(HostError::new(
                    HostErrorKind::IllegalState,
                    format!("field `{}` is read-only", field.name),
                )),
            },
        };
        result.map_err(|cause| IxError::invocation(self.describe(), site, cause))
    }
}

#[derive(Clone)]
pub struct Caller {
    shape: Shape,
    method: Arc<MethodDescriptor>,
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("shape", &self.shape)
            .field("method", &self.signature())
            .finish()
    }
}

impl Caller {
    pub(crate) fn new(shape: Shape, method: Arc<MethodDescriptor>) -> Self {
        Self { shape, method }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn signature(&self) -> String {
        self.method.signature()
    }

    pub fn invoke(&self, value: &Value, args: &[Value], site: &CallSiteInfo) -> Result<Value, IxError> {
        check_shape(self.shape, value, &self.method.name, site)?;
        if !is_applicable(&self.method, args) {
            return Err(IxError::resolution(
                RESOLVE_SHAPE_MISMATCH,
                format!("arguments do not match `{}`", self.method.signature()),
                site,
            ));
        }
        (self.method.func)(value, &pack_arguments(&self.method, args))
            .map_err(|cause| IxError::invocation(self.method.name.clone(), site, cause))
    }
}

/// Any of the three resolved binding kinds, as stored in the resolution cache.
#[derive(Clone)]
pub enum AccessorHandle {
    Getter(Getter),
    Setter(Setter),
    Caller(Caller),
}

impl AccessorHandle {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Getter(getter) => getter.shape(),
            Self::Setter(setter) => setter.shape(),
            Self::Caller(caller) => caller.shape(),
        }
    }
}
