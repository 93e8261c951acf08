use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ix_compiler::{compile_script, DEFAULT_SCRIPT_NAME};
use ix_core::{CallSiteInfo, IxError, Script, Value};
use ix_runtime::{CacheStats, Context, Interpreter, InterpreterPolicy, ResolutionProvider, Resolver};
use reqwest::Url;
use tracing::{debug, info};

use crate::options::EngineOptions;
use crate::script_cache::ScriptCache;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn unreadable(name: &str, message: String) -> IxError {
    IxError::compilation(message, CallSiteInfo::new(name, 1, 1))
}

/// Compiles scripts and runs them against one shared resolver.
pub struct Engine {
    options: EngineOptions,
    policy: InterpreterPolicy,
    resolver: Resolver,
    scripts: Mutex<ScriptCache>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, IxError> {
        let capacity = options.cache_capacity()?;
        Ok(Self::build(options, capacity))
    }

    pub(crate) fn build(options: EngineOptions, capacity: usize) -> Self {
        let policy = options.policy();
        let resolver = Resolver::new();
        resolver.initialize();
        info!(cache_size = capacity, policy = ?policy, "engine constructed");
        Self {
            options,
            policy,
            resolver,
            scripts: Mutex::new(ScriptCache::new(capacity)),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn policy(&self) -> InterpreterPolicy {
        self.policy
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolution_stats(&self) -> CacheStats {
        self.resolver.cache().stats()
    }

    pub fn cached_scripts(&self) -> usize {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn create_script(&self, text: &str) -> Result<Arc<Script>, IxError> {
        self.compile_cached(DEFAULT_SCRIPT_NAME, text)
    }

    pub fn create_script_from_file(&self, path: impl AsRef<Path>) -> Result<Arc<Script>, IxError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|error| unreadable(&name, format!("cannot read script file: {}", error)))?;
        self.compile_cached(&name, &text)
    }

    /// Loads a script from a `file:`, `http:` or `https:` URL.
    pub fn create_script_from_url(&self, url: &str) -> Result<Arc<Script>, IxError> {
        let parsed = Url::parse(url)
            .map_err(|error| unreadable(url, format!("invalid script url: {}", error)))?;
        let text = match parsed.scheme() {
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| unreadable(url, "file url has no local path".to_string()))?;
                fs::read_to_string(path).map_err(|error| {
                    unreadable(url, format!("cannot read script file: {}", error))
                })?
            }
            "http" | "https" => fetch(&parsed).map_err(|error| {
                unreadable(url, format!("cannot fetch script: {}", error))
            })?,
            other => {
                return Err(unreadable(
                    url,
                    format!("unsupported script url scheme `{}`", other),
                ))
            }
        };
        self.compile_cached(url, &text)
    }

    fn compile_cached(&self, name: &str, text: &str) -> Result<Arc<Script>, IxError> {
        if let Some(script) = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name, text)
        {
            debug!(script = name, "script cache hit");
            return Ok(script);
        }
        let script = Arc::new(compile_script(name, text)?);
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(script.clone());
        Ok(script)
    }

    pub fn execute(&self, script: &Script, context: &mut dyn Context) -> Result<Value, IxError> {
        Interpreter::new(&self.resolver, self.policy, context).interpret(script)
    }
}

fn fetch(url: &Url) -> Result<String, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    client.get(url.clone()).send()?.error_for_status()?.text()
}
