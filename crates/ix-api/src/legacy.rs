//! Process-wide engine for callers written against the old free-function API.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use ix_core::{IxError, Script};

use crate::engine::Engine;
use crate::options::{EngineOptions, LEGACY_CACHE_SIZE};

static LEGACY_ENGINE: OnceLock<Engine> = OnceLock::new();
static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// The shared strict-legacy engine, built on first use.
///
/// Concurrent first callers block until construction finishes and all
/// observe the same instance.
#[deprecated(note = "construct an `Engine` with explicit `EngineOptions`")]
pub fn legacy_engine() -> &'static Engine {
    LEGACY_ENGINE.get_or_init(|| {
        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Engine::build(EngineOptions::legacy(), LEGACY_CACHE_SIZE as usize)
    })
}

#[deprecated(note = "use `Engine::create_script`")]
#[allow(deprecated)]
pub fn create_script(text: &str) -> Result<Arc<Script>, IxError> {
    legacy_engine().create_script(text)
}

#[deprecated(note = "use `Engine::create_script_from_file`")]
#[allow(deprecated)]
pub fn create_script_from_file(path: impl AsRef<Path>) -> Result<Arc<Script>, IxError> {
    legacy_engine().create_script_from_file(path)
}

#[deprecated(note = "use `Engine::create_script_from_url`")]
#[allow(deprecated)]
pub fn create_script_from_url(url: &str) -> Result<Arc<Script>, IxError> {
    legacy_engine().create_script_from_url(url)
}
