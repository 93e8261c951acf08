//! Dynamic member resolution and the evaluator that drives it.
//!
//! A [`Resolver`] maps `(operation, name, runtime shape)` to a reusable
//! handle and memoizes the outcome, failures included. The [`Interpreter`]
//! resolves every property access, method call and loop through it and lets
//! an [`InterpreterPolicy`] decide which failures surface.

mod builtins;
pub mod cache;
pub mod context;
pub mod handle;
pub mod interpreter;
pub mod introspector;
pub mod iteration;
mod overload;
pub mod policy;
pub mod provider;

pub use cache::{CacheEntry, CacheStats, OperationKind, ResolutionCache, ResolutionKey};
pub use context::{Context, MapContext};
pub use handle::{AccessorHandle, Caller, Getter, Setter};
pub use interpreter::Interpreter;
pub use introspector::{ClassIntrospector, Introspector};
pub use iteration::{IterationAdapter, IterationStrategy};
pub use policy::InterpreterPolicy;
pub use provider::{ResolutionProvider, Resolver};
