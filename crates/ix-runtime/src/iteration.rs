use std::fmt;
use std::sync::Arc;

use ix_core::{CallSiteInfo, HostSequence, IterationHook, IxError, MethodDescriptor, Value};

use crate::overload::pack_arguments;

/// How values of one shape are turned into a sequence. Cached per shape.
#[derive(Clone)]
pub enum IterationStrategy {
    Empty,
    Elements,
    MapValues,
    Hook(IterationHook),
    /// A zero-argument `iterator()` member whose result is iterated in turn.
    IteratorMethod(Arc<MethodDescriptor>),
    Single,
}

impl fmt::Debug for IterationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Elements => f.write_str("Elements"),
            Self::MapValues => f.write_str("MapValues"),
            Self::Hook(_) => f.write_str("Hook"),
            Self::IteratorMethod(method) => write!(f, "IteratorMethod({})", method.signature()),
            Self::Single => f.write_str("Single"),
        }
    }
}

impl IterationStrategy {
    pub(crate) fn adapt(&self, value: &Value, site: &CallSiteInfo) -> Result<IterationAdapter, IxError> {
        match (self, value) {
            (Self::Empty, _) | (_, Value::Null) => Ok(IterationAdapter::empty()),
            (Self::Elements, Value::Array(values)) => Ok(IterationAdapter::from_values(values.clone())),
            (Self::MapValues, Value::Map(values)) => {
                Ok(IterationAdapter::from_values(values.values().cloned().collect()))
            }
            (Self::Hook(hook), _) => hook(value)
                .map(IterationAdapter::from_sequence)
                .map_err(|cause| IxError::invocation("iterate", site, cause)),
            (Self::IteratorMethod(method), _) => {
                let produced = (method.func)(value, &pack_arguments(method, &[]))
                    .map_err(|cause| IxError::invocation(method.name.clone(), site, cause))?;
                match produced {
                    Value::Array(values) => Ok(IterationAdapter::from_values(values)),
                    Value::Map(values) => {
                        Ok(IterationAdapter::from_values(values.into_values().collect()))
                    }
                    Value::Null => Ok(IterationAdapter::empty()),
                    other => Ok(IterationAdapter::from_values(vec![other])),
                }
            }
            _ => Ok(IterationAdapter::from_values(vec![value.clone()])),
        }
    }
}

/// One pass over a host value, handed to a `for` loop.
///
/// Not restartable: request a fresh adapter per loop entry. A release hook,
/// if any, runs exactly once, either through [`IterationAdapter::release`] or
/// when the adapter is dropped.
pub struct IterationAdapter {
    items: Box<dyn Iterator<Item = Value> + Send>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl IterationAdapter {
    pub fn empty() -> Self {
        Self::from_values(Vec::new())
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            items: Box::new(values.into_iter()),
            release: None,
        }
    }

    pub fn from_sequence(sequence: HostSequence) -> Self {
        Self {
            items: sequence.items,
            release: sequence.release,
        }
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Iterator for IterationAdapter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.items.next()
    }
}

impl Drop for IterationAdapter {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for IterationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterationAdapter")
            .field("releasable", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod iteration_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn release_runs_once_whether_explicit_or_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));

        let counter = released.clone();
        let adapter = IterationAdapter::from_sequence(
            HostSequence::new(vec![Value::Int(1)].into_iter())
                .on_release(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        adapter.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);

        let counter = released.clone();
        let mut adapter = IterationAdapter::from_sequence(
            HostSequence::new(vec![Value::Int(1), Value::Int(2)].into_iter())
                .on_release(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        assert_eq!(adapter.next(), Some(Value::Int(1)));
        drop(adapter);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn strategies_adapt_containers_and_scalars() {
        let site = CallSiteInfo::synthetic();
        let values = IterationStrategy::Elements
            .adapt(&Value::Array(vec![Value::Int(1), Value::Int(2)]), &site)
            .expect("array")
            .collect::<Vec<_>>();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);

        let values = IterationStrategy::Single
            .adapt(&Value::Int(7), &site)
            .expect("scalar")
            .collect::<Vec<_>>();
        assert_eq!(values, vec![Value::Int(7)]);

        assert_eq!(
            IterationStrategy::Single
                .adapt(&Value::Null, &site)
                .expect("null")
                .count(),
            0
        );
    }
}
