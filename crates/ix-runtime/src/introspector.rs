use std::sync::Arc;

use ix_core::{ClassDescriptor, FieldDescriptor, IterationHook, MethodDescriptor};

/// Raw member enumeration over a class descriptor.
///
/// The resolver owns matching and caching; this seam only answers "which
/// members of this shape carry this name". Alternate implementations can
/// hide members, add synthetic ones, or count lookups.
pub trait Introspector: Send + Sync {
    /// Candidates in declaration order.
    fn methods_named(&self, class: &ClassDescriptor, name: &str) -> Vec<Arc<MethodDescriptor>>;

    fn field_named(&self, class: &ClassDescriptor, name: &str) -> Option<Arc<FieldDescriptor>>;

    fn iteration_hook(&self, class: &ClassDescriptor) -> Option<IterationHook>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ClassIntrospector;

impl Introspector for ClassIntrospector {
    fn methods_named(&self, class: &ClassDescriptor, name: &str) -> Vec<Arc<MethodDescriptor>> {
        class
            .methods()
            .iter()
            .filter(|method| method.name == name)
            .cloned()
            .collect()
    }

    fn field_named(&self, class: &ClassDescriptor, name: &str) -> Option<Arc<FieldDescriptor>> {
        class
            .fields()
            .iter()
            .find(|field| field.name == name)
            .cloned()
    }

    fn iteration_hook(&self, class: &ClassDescriptor) -> Option<IterationHook> {
        class.iteration_hook().cloned()
    }
}
