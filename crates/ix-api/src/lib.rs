//! Embedding surface: an [`Engine`] that compiles scripts, caches them, and
//! evaluates them with dynamic member resolution against host objects.

mod engine;
pub mod legacy;
mod options;
mod script_cache;

pub use engine::Engine;
pub use options::{EngineOptions, DEFAULT_CACHE_SIZE, LEGACY_CACHE_SIZE};

#[allow(deprecated)]
pub use legacy::{create_script, create_script_from_file, create_script_from_url, legacy_engine};

pub use ix_compiler::{compile_script, DEFAULT_SCRIPT_NAME};
pub use ix_core::{
    CallSiteInfo, ClassBuilder, ClassDescriptor, HostError, HostErrorKind, HostObject,
    HostSequence, IxError, ParamType, Script, Shape, Value,
};
pub use ix_runtime::{
    CacheStats, Context, Interpreter, InterpreterPolicy, MapContext, ResolutionProvider, Resolver,
};
