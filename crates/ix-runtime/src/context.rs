use std::collections::BTreeMap;

use ix_core::Value;

/// Variable storage a script reads from and assigns into.
pub trait Context {
    fn get(&self, name: &str) -> Option<Value>;
    fn has(&self, name: &str) -> bool;
    fn set(&mut self, name: &str, value: Value);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapContext {
    vars: BTreeMap<String, Value>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    pub fn into_vars(self) -> BTreeMap<String, Value> {
        self.vars
    }
}

impl From<BTreeMap<String, Value>> for MapContext {
    fn from(vars: BTreeMap<String, Value>) -> Self {
        Self { vars }
    }
}

impl Context for MapContext {
    fn get(&self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }
}
