use std::sync::{Arc, OnceLock};

use ix_core::error::{RESOLVE_METHOD_NOT_FOUND, RESOLVE_PROPERTY_NOT_FOUND, RESOLVE_SETTER_NOT_FOUND};
use ix_core::{CallSiteInfo, ClassDescriptor, IxError, Shape, Value};
use tracing::{debug, trace, warn};

use crate::builtins::BuiltinClasses;
use crate::cache::{CacheEntry, OperationKind, ResolutionCache, ResolutionKey};
use crate::handle::{AccessorHandle, Caller, Getter, Setter};
use crate::introspector::{ClassIntrospector, Introspector};
use crate::iteration::{IterationAdapter, IterationStrategy};
use crate::overload::best_fit;

/// Turns a dynamic operation on a runtime value into a reusable binding.
///
/// Implementations must be safe to share between threads; the interpreter
/// only ever holds a `&dyn ResolutionProvider`.
pub trait ResolutionProvider: Send + Sync {
    /// Prepares builtin member tables. Calling it again is a no-op.
    fn initialize(&self);

    fn resolve_iteration(
        &self,
        value: &Value,
        site: &CallSiteInfo,
    ) -> Result<IterationAdapter, IxError>;

    fn resolve_method(
        &self,
        value: &Value,
        name: &str,
        args: &[Value],
        site: &CallSiteInfo,
    ) -> Result<Caller, IxError>;

    fn resolve_property_get(
        &self,
        value: &Value,
        identifier: &str,
        site: &CallSiteInfo,
    ) -> Result<Getter, IxError>;

    fn resolve_property_set(
        &self,
        value: &Value,
        identifier: &str,
        new_value: &Value,
        site: &CallSiteInfo,
    ) -> Result<Setter, IxError>;
}

fn capitalize(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe_args(args: &[Value]) -> String {
    Shape::of_all(args)
        .iter()
        .map(Shape::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default provider: introspects class descriptors and memoizes every
/// outcome, failures included, per operation and runtime shape.
pub struct Resolver {
    introspector: Arc<dyn Introspector>,
    cache: ResolutionCache,
    builtins: OnceLock<BuiltinClasses>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_introspector(Arc::new(ClassIntrospector))
    }

    pub fn with_introspector(introspector: Arc<dyn Introspector>) -> Self {
        Self {
            introspector,
            cache: ResolutionCache::new(),
            builtins: OnceLock::new(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn introspector(&self) -> &Arc<dyn Introspector> {
        &self.introspector
    }

    fn builtins(&self) -> Result<&BuiltinClasses, IxError> {
        self.builtins.get().ok_or_else(|| {
            IxError::configuration("resolver used before initialize() was called")
        })
    }

    fn class_of(
        &self,
        value: &Value,
        code: &'static str,
        what: &str,
        site: &CallSiteInfo,
    ) -> Result<Arc<ClassDescriptor>, IxError> {
        self.builtins()?.class_of(value).ok_or_else(|| {
            IxError::resolution(
                code,
                format!("{} value has no {}", value.type_name(), what),
                site,
            )
        })
    }

    /// Cache-first resolution shared by the three handle kinds.
    fn resolve_handle<T: Clone>(
        &self,
        key: ResolutionKey,
        site: &CallSiteInfo,
        unwrap: fn(AccessorHandle) -> Option<T>,
        wrap: fn(T) -> AccessorHandle,
        introspect: impl FnOnce() -> Result<T, IxError>,
    ) -> Result<T, IxError> {
        match self.cache.get(&key) {
            Some(CacheEntry::Tombstone { code, message }) => {
                trace!(name = %key.name, shape = %key.shape, code, "replaying cached resolution failure");
                return Err(IxError::resolution(code, message, site));
            }
            Some(CacheEntry::Handle(handle)) if handle.shape() == key.shape => {
                if let Some(resolved) = unwrap(handle) {
                    trace!(name = %key.name, shape = %key.shape, "resolution cache hit");
                    return Ok(resolved);
                }
                warn!(name = %key.name, "cached handle has the wrong kind; resolving again");
                self.cache.remove(&key);
            }
            Some(_) => {
                warn!(name = %key.name, shape = %key.shape, "cached entry does not match its key; resolving again");
                self.cache.remove(&key);
            }
            None => {}
        }

        debug!(kind = ?key.kind, name = %key.name, shape = %key.shape, "resolution cache miss");
        match introspect() {
            Ok(resolved) => {
                self.cache
                    .insert(key, CacheEntry::Handle(wrap(resolved.clone())));
                Ok(resolved)
            }
            Err(error) => {
                if let IxError::Resolution { code, message, .. } = &error {
                    debug!(name = %key.name, shape = %key.shape, code = *code, "caching resolution failure");
                    self.cache.insert(
                        key,
                        CacheEntry::Tombstone {
                            code,
                            message: message.clone(),
                        },
                    );
                }
                Err(error)
            }
        }
    }

    fn introspect_method(
        &self,
        value: &Value,
        name: &str,
        args: &[Value],
        site: &CallSiteInfo,
    ) -> Result<Caller, IxError> {
        let class = self.class_of(value, RESOLVE_METHOD_NOT_FOUND, &format!("method `{}`", name), site)?;
        let candidates = self.introspector.methods_named(&class, name);
        if candidates.is_empty() {
            return Err(IxError::resolution(
                RESOLVE_METHOD_NOT_FOUND,
                format!("{} has no method `{}`", class.name(), name),
                site,
            ));
        }
        best_fit(candidates, args)
            .map(|method| Caller::new(Shape::of(value), method))
            .ok_or_else(|| {
                IxError::resolution(
                    RESOLVE_METHOD_NOT_FOUND,
                    format!(
                        "no overload of {}.{} accepts ({})",
                        class.name(),
                        name,
                        describe_args(args)
                    ),
                    site,
                )
            })
    }

    fn introspect_getter(
        &self,
        value: &Value,
        identifier: &str,
        site: &CallSiteInfo,
    ) -> Result<Getter, IxError> {
        let class = self.class_of(
            value,
            RESOLVE_PROPERTY_NOT_FOUND,
            &format!("property `{}`", identifier),
            site,
        )?;
        let shape = Shape::of(value);
        let capitalized = capitalize(identifier);

        for accessor in [
            format!("get{}", capitalized),
            format!("get{}", identifier),
            format!("is{}", capitalized),
        ] {
            let candidates = self.introspector.methods_named(&class, &accessor);
            if let Some(method) = best_fit(candidates, &[]) {
                return Ok(Getter::accessor(shape, method));
            }
        }

        let candidates = self.introspector.methods_named(&class, "get");
        if let Some(method) = best_fit(candidates, &[Value::String(identifier.to_string())]) {
            return Ok(Getter::indexed(shape, method, identifier));
        }

        if let Some(field) = self.introspector.field_named(&class, identifier) {
            return Ok(Getter::field(shape, field));
        }

        Err(IxError::resolution(
            RESOLVE_PROPERTY_NOT_FOUND,
            format!("{} has no property `{}`", class.name(), identifier),
            site,
        ))
    }

    fn introspect_setter(
        &self,
        value: &Value,
        identifier: &str,
        new_value: &Value,
        site: &CallSiteInfo,
    ) -> Result<Setter, IxError> {
        let class = self.class_of(
            value,
            RESOLVE_SETTER_NOT_FOUND,
            &format!("property `{}`", identifier),
            site,
        )?;
        let shape = Shape::of(value);

        let mutators = self
            .introspector
            .methods_named(&class, &format!("set{}", capitalize(identifier)));
        let has_mutator = !mutators.is_empty();
        if let Some(method) = best_fit(mutators, std::slice::from_ref(new_value)) {
            return Ok(Setter::mutator(shape, method));
        }

        let indexed_args = [Value::String(identifier.to_string()), new_value.clone()];
        for indexed in ["put", "set"] {
            let candidates = self.introspector.methods_named(&class, indexed);
            if let Some(method) = best_fit(candidates, &indexed_args) {
                return Ok(Setter::indexed(shape, method, identifier));
            }
        }

        let field = self.introspector.field_named(&class, identifier);
        if let Some(field) = &field {
            if field.write.is_some() && field.ty.accepts(new_value) {
                return Ok(Setter::field(shape, field.clone()));
            }
        }

        let message = match field {
            Some(field) if field.write.is_none() => {
                format!("{}.{} is read-only", class.name(), identifier)
            }
            Some(field) => format!(
                "{}.{} of type {} does not accept a {} value",
                class.name(),
                identifier,
                field.ty,
                new_value.type_name()
            ),
            None if has_mutator => format!(
                "no setter {}.set{} accepts a {} value",
                class.name(),
                capitalize(identifier),
                new_value.type_name()
            ),
            None => format!("{} has no writable property `{}`", class.name(), identifier),
        };
        Err(IxError::resolution(RESOLVE_SETTER_NOT_FOUND, message, site))
    }

    fn iteration_strategy(&self, value: &Value) -> IterationStrategy {
        match value {
            Value::Null => IterationStrategy::Empty,
            Value::Array(_) => IterationStrategy::Elements,
            Value::Map(_) => IterationStrategy::MapValues,
            Value::Object(object) => {
                let class = object.class();
                if let Some(hook) = self.introspector.iteration_hook(&class) {
                    IterationStrategy::Hook(hook)
                } else if let Some(method) =
                    best_fit(self.introspector.methods_named(&class, "iterator"), &[])
                {
                    IterationStrategy::IteratorMethod(method)
                } else {
                    IterationStrategy::Single
                }
            }
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
                IterationStrategy::Single
            }
        }
    }
}

impl ResolutionProvider for Resolver {
    fn initialize(&self) {
        self.builtins.get_or_init(|| {
            debug!("building builtin member tables");
            BuiltinClasses::new()
        });
    }

    fn resolve_iteration(
        &self,
        value: &Value,
        site: &CallSiteInfo,
    ) -> Result<IterationAdapter, IxError> {
        self.builtins()?;
        let key = ResolutionKey::new(OperationKind::Iterate, "", value, &[]);
        let strategy = match self.cache.get(&key) {
            Some(CacheEntry::Iteration(strategy)) => strategy,
            cached => {
                if cached.is_some() {
                    warn!(shape = %key.shape, "cached entry does not match its key; resolving again");
                }
                let strategy = self.iteration_strategy(value);
                debug!(shape = %key.shape, strategy = ?strategy, "resolved iteration strategy");
                self.cache
                    .insert(key, CacheEntry::Iteration(strategy.clone()));
                strategy
            }
        };
        strategy.adapt(value, site)
    }

    fn resolve_method(
        &self,
        value: &Value,
        name: &str,
        args: &[Value],
        site: &CallSiteInfo,
    ) -> Result<Caller, IxError> {
        self.builtins()?;
        let key = ResolutionKey::new(OperationKind::Method, name, value, args);
        self.resolve_handle(
            key,
            site,
            |handle| match handle {
                AccessorHandle::Caller(caller) => Some(caller),
                _ => None,
            },
            AccessorHandle::Caller,
            || self.introspect_method(value, name, args, site),
        )
    }

    fn resolve_property_get(
        &self,
        value: &Value,
        identifier: &str,
        site: &CallSiteInfo,
    ) -> Result<Getter, IxError> {
        self.builtins()?;
        let key = ResolutionKey::new(OperationKind::PropertyGet, identifier, value, &[]);
        self.resolve_handle(
            key,
            site,
            |handle| match handle {
                AccessorHandle::Getter(getter) => Some(getter),
                _ => None,
            },
            AccessorHandle::Getter,
            || self.introspect_getter(value, identifier, site),
        )
    }

    fn resolve_property_set(
        &self,
        value: &Value,
        identifier: &str,
        new_value: &Value,
        site: &CallSiteInfo,
    ) -> Result<Setter, IxError> {
        self.builtins()?;
        let key = ResolutionKey::new(
            OperationKind::PropertySet,
            identifier,
            value,
            std::slice::from_ref(new_value),
        );
        self.resolve_handle(
            key,
            site,
            |handle| match handle {
                AccessorHandle::Setter(setter) => Some(setter),
                _ => None,
            },
            AccessorHandle::Setter,
            || self.introspect_setter(value, identifier, new_value, site),
        )
    }
}

#[cfg(test)]
mod provider_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use ix_core::error::RESOLVE_SHAPE_MISMATCH;
    use ix_core::{
        ClassBuilder, FieldDescriptor, HostError, HostObject, IterationHook, MethodDescriptor,
        ParamType,
    };

    #[derive(Debug)]
    struct Point {
        class: Arc<ClassDescriptor>,
        x: Mutex<i64>,
    }

    impl HostObject for Point {
        fn class(&self) -> Arc<ClassDescriptor> {
            self.class.clone()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn point_class(offset: i64) -> Arc<ClassDescriptor> {
        ClassBuilder::<Point>::new("Point")
            .method("getX", &[], move |point, _| {
                Ok(Value::Int(*point.x.lock().expect("x lock") + offset))
            })
            .method("setX", &[ParamType::Integer], |point, args| {
                *point.x.lock().expect("x lock") = args[0].as_int().unwrap_or_default();
                Ok(Value::Null)
            })
            .method("isOrigin", &[], |point, _| {
                Ok(Value::Bool(*point.x.lock().expect("x lock") == 0))
            })
            .method("fail", &[], |_, _| Err(HostError::runtime("boom")))
            .field("label", ParamType::String, |_| Value::from("p"))
            .build()
    }

    fn point(class: &Arc<ClassDescriptor>, x: i64) -> Value {
        Value::object(Point {
            class: class.clone(),
            x: Mutex::new(x),
        })
    }

    fn ready() -> Resolver {
        let resolver = Resolver::new();
        resolver.initialize();
        resolver
    }

    #[derive(Default)]
    struct CountingIntrospector {
        inner: ClassIntrospector,
        lookups: AtomicUsize,
    }

    impl Introspector for CountingIntrospector {
        fn methods_named(&self, class: &ClassDescriptor, name: &str) -> Vec<Arc<MethodDescriptor>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.methods_named(class, name)
        }

        fn field_named(&self, class: &ClassDescriptor, name: &str) -> Option<Arc<FieldDescriptor>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.field_named(class, name)
        }

        fn iteration_hook(&self, class: &ClassDescriptor) -> Option<IterationHook> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.iteration_hook(class)
        }
    }

    #[test]
    fn resolving_before_initialize_is_a_configuration_error() {
        let resolver = Resolver::new();
        let error = resolver
            .resolve_property_get(&Value::from("x"), "length", &CallSiteInfo::synthetic())
            .expect_err("not initialized");
        assert_eq!(error.code(), "CONFIGURATION_INVALID");
    }

    #[test]
    fn second_resolution_skips_introspection() {
        let counting = Arc::new(CountingIntrospector::default());
        let resolver = Resolver::with_introspector(counting.clone());
        resolver.initialize();
        let site = CallSiteInfo::synthetic();
        let class = point_class(0);

        let first = resolver
            .resolve_property_get(&point(&class, 3), "x", &site)
            .expect("getX");
        let after_first = counting.lookups.load(Ordering::SeqCst);
        assert!(after_first > 0);

        let second = resolver
            .resolve_property_get(&point(&class, 4), "x", &site)
            .expect("cached getX");
        assert_eq!(counting.lookups.load(Ordering::SeqCst), after_first);
        assert_eq!(first.describe(), second.describe());
        assert_eq!(second.invoke(&point(&class, 4), &site).expect("invoke"), Value::Int(4));
    }

    #[test]
    fn failures_are_tombstoned_and_replayed() {
        let counting = Arc::new(CountingIntrospector::default());
        let resolver = Resolver::with_introspector(counting.clone());
        resolver.initialize();
        let site = CallSiteInfo::new("main", 2, 5);
        let class = point_class(0);

        let error = resolver
            .resolve_method(&point(&class, 1), "missing", &[], &site)
            .expect_err("no such method");
        assert_eq!(error.code(), RESOLVE_METHOD_NOT_FOUND);
        let lookups = counting.lookups.load(Ordering::SeqCst);

        let replayed = resolver
            .resolve_method(&point(&class, 1), "missing", &[], &site)
            .expect_err("tombstone");
        assert_eq!(replayed.code(), RESOLVE_METHOD_NOT_FOUND);
        assert_eq!(replayed.site(), Some(&site));
        assert_eq!(counting.lookups.load(Ordering::SeqCst), lookups);
        assert_eq!(resolver.cache().stats().tombstone_hits, 1);
    }

    #[test]
    fn same_named_classes_do_not_share_bindings() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let plain = point_class(0);
        let shifted = point_class(100);

        let plain_getter = resolver
            .resolve_property_get(&point(&plain, 1), "x", &site)
            .expect("plain");
        let shifted_getter = resolver
            .resolve_property_get(&point(&shifted, 1), "x", &site)
            .expect("shifted");
        assert_ne!(plain_getter.shape(), shifted_getter.shape());
        assert_eq!(
            shifted_getter.invoke(&point(&shifted, 1), &site).expect("shifted x"),
            Value::Int(101)
        );

        let error = plain_getter
            .invoke(&point(&shifted, 1), &site)
            .expect_err("wrong shape");
        assert_eq!(error.code(), RESOLVE_SHAPE_MISMATCH);
    }

    #[test]
    fn property_get_tries_accessors_then_indexed_then_fields() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let class = point_class(0);
        let origin = point(&class, 0);

        let getter = resolver.resolve_property_get(&origin, "origin", &site).expect("isOrigin");
        assert_eq!(getter.describe(), "isOrigin()");
        assert_eq!(getter.invoke(&origin, &site).expect("origin"), Value::Bool(true));

        let getter = resolver.resolve_property_get(&origin, "label", &site).expect("field");
        assert_eq!(getter.invoke(&origin, &site).expect("label"), Value::from("p"));

        let map = Value::Map([("k".to_string(), Value::Int(1))].into_iter().collect());
        let getter = resolver.resolve_property_get(&map, "k", &site).expect("map get");
        assert_eq!(getter.describe(), "get(\"k\")");
        assert_eq!(getter.invoke(&map, &site).expect("k"), Value::Int(1));

        let error = resolver
            .resolve_property_get(&Value::Int(1), "x", &site)
            .expect_err("ints have no members");
        assert_eq!(error.code(), RESOLVE_PROPERTY_NOT_FOUND);
    }

    #[test]
    fn property_set_rejects_mismatched_types_without_coercion() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let class = point_class(0);
        let target = point(&class, 0);

        let setter = resolver
            .resolve_property_set(&target, "x", &Value::Int(9), &site)
            .expect("setX");
        setter.invoke(&target, Value::Int(9), &site).expect("set");
        let getter = resolver.resolve_property_get(&target, "x", &site).expect("getX");
        assert_eq!(getter.invoke(&target, &site).expect("x"), Value::Int(9));

        let error = resolver
            .resolve_property_set(&target, "x", &Value::from("9"), &site)
            .expect_err("string is not an integer");
        assert_eq!(error.code(), RESOLVE_SETTER_NOT_FOUND);

        let error = resolver
            .resolve_property_set(&target, "label", &Value::from("q"), &site)
            .expect_err("read-only field");
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn host_failures_surface_as_invocation_errors() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let class = point_class(0);
        let target = point(&class, 0);
        let caller = resolver.resolve_method(&target, "fail", &[], &site).expect("fail exists");
        let error = caller.invoke(&target, &[], &site).expect_err("raises");
        assert!(error.is_invocation());
        assert!(!error.is_resolution());
    }

    #[test]
    fn iteration_falls_back_to_a_single_element() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let class = point_class(0);
        let target = point(&class, 5);

        let items = resolver
            .resolve_iteration(&target, &site)
            .expect("objects iterate as themselves")
            .collect::<Vec<_>>();
        assert_eq!(items, vec![target]);

        let items = resolver
            .resolve_iteration(&Value::Map([("b".to_string(), Value::Int(2)), ("a".to_string(), Value::Int(1))].into_iter().collect()), &site)
            .expect("map values")
            .collect::<Vec<_>>();
        assert_eq!(items, vec![Value::Int(1), Value::Int(2)]);
    }

    #[derive(Debug)]
    struct Bag {
        class: Arc<ClassDescriptor>,
    }

    impl HostObject for Bag {
        fn class(&self) -> Arc<ClassDescriptor> {
            self.class.clone()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn packed_len(args: &[Value]) -> Result<Value, HostError> {
        match args.last() {
            Some(Value::Array(rest)) => Ok(Value::Int(rest.len() as i64)),
            other => Err(HostError::illegal_argument(format!(
                "trailing arguments arrived unpacked: {:?}",
                other
            ))),
        }
    }

    fn bag() -> Value {
        let class = ClassBuilder::<Bag>::new("Bag")
            .variadic_method("getTags", &[ParamType::Any], |_, args| packed_len(args))
            .variadic_method("get", &[ParamType::String, ParamType::Any], |_, args| {
                packed_len(args)
            })
            .variadic_method("iterator", &[ParamType::Any], |_, args| {
                packed_len(args).map(|len| Value::Array(vec![len]))
            })
            .build();
        Value::object(Bag { class })
    }

    #[test]
    fn variadic_members_receive_packed_arguments_when_read_as_properties() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let target = bag();

        let called = resolver
            .resolve_method(&target, "getTags", &[], &site)
            .expect("getTags")
            .invoke(&target, &[], &site)
            .expect("called directly");
        let read = resolver
            .resolve_property_get(&target, "tags", &site)
            .expect("tags")
            .invoke(&target, &site)
            .expect("read as a property");
        assert_eq!(called, Value::Int(0));
        assert_eq!(read, called);

        let indexed = resolver
            .resolve_property_get(&target, "color", &site)
            .expect("indexed get");
        assert_eq!(indexed.describe(), "get(\"color\")");
        assert_eq!(indexed.invoke(&target, &site).expect("packed key call"), Value::Int(0));

        let items = resolver
            .resolve_iteration(&target, &site)
            .expect("iterator() fallback")
            .collect::<Vec<_>>();
        assert_eq!(items, vec![Value::Int(0)]);
    }

    #[test]
    fn a_method_cached_for_one_shape_stays_missing_on_a_same_named_shape() {
        let resolver = ready();
        let site = CallSiteInfo::synthetic();
        let plain = point_class(0);
        let scalable = ClassBuilder::<Point>::new("Point")
            .method("scale", &[ParamType::Integer], |point, args| {
                let factor = args[0].as_int().unwrap_or_default();
                Ok(Value::Int(*point.x.lock().expect("x lock") * factor))
            })
            .build();
        assert_eq!(plain.name(), scalable.name());

        let scaled = resolver
            .resolve_method(&point(&scalable, 4), "scale", &[Value::Int(3)], &site)
            .expect("scale exists on the scalable shape");
        assert_eq!(
            scaled.invoke(&point(&scalable, 4), &[Value::Int(3)], &site).expect("scale"),
            Value::Int(12)
        );

        let error = resolver
            .resolve_method(&point(&plain, 4), "scale", &[Value::Int(3)], &site)
            .expect_err("plain Point has no scale");
        assert_eq!(error.code(), RESOLVE_METHOD_NOT_FOUND);

        let error = scaled
            .invoke(&point(&plain, 4), &[Value::Int(3)], &site)
            .expect_err("cached caller rejects the other shape");
        assert_eq!(error.code(), RESOLVE_SHAPE_MISMATCH);

        assert!(resolver
            .resolve_method(&point(&scalable, 1), "scale", &[Value::Int(2)], &site)
            .is_ok());
    }

    #[test]
    fn the_introspection_seam_is_reachable() {
        let counting = Arc::new(CountingIntrospector::default());
        let resolver = Resolver::with_introspector(counting.clone());
        let class = point_class(0);
        assert_eq!(resolver.introspector().methods_named(&class, "getX").len(), 1);
        assert_eq!(counting.lookups.load(Ordering::SeqCst), 1);
    }
}
