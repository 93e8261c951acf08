use ix_core::IxError;
use ix_runtime::InterpreterPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_SIZE: i64 = 512;
pub const LEGACY_CACHE_SIZE: i64 = 256;

/// Construction-time engine settings. Fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Compiled scripts kept by source text; `0` disables the cache.
    pub cache_size: i64,
    pub silent: bool,
    /// Selects the strict-legacy policy; `silent` is then ignored.
    pub legacy: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            silent: false,
            legacy: false,
        }
    }
}

impl EngineOptions {
    pub fn legacy() -> Self {
        Self {
            cache_size: LEGACY_CACHE_SIZE,
            silent: false,
            legacy: true,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, IxError> {
        let options: Self = serde_json::from_str(text)
            .map_err(|error| IxError::configuration(format!("invalid engine options: {}", error)))?;
        options.cache_capacity()?;
        Ok(options)
    }

    pub fn cache_capacity(&self) -> Result<usize, IxError> {
        usize::try_from(self.cache_size).map_err(|_| {
            IxError::configuration(format!(
                "cache_size must not be negative, got {}",
                self.cache_size
            ))
        })
    }

    pub fn policy(&self) -> InterpreterPolicy {
        if self.legacy {
            InterpreterPolicy::StrictLegacy
        } else {
            InterpreterPolicy::Modern {
                silent: self.silent,
            }
        }
    }
}
