use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ix_core::Script;
use tracing::trace;

/// Least-recently-used store of compiled scripts, keyed by name and source.
pub(crate) struct ScriptCache {
    capacity: usize,
    tick: u64,
    entries: HashMap<(String, String), (u64, Arc<Script>)>,
    recency: BTreeMap<u64, (String, String)>,
}

impl ScriptCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub(crate) fn get(&mut self, name: &str, source: &str) -> Option<Arc<Script>> {
        let key = (name.to_string(), source.to_string());
        let tick = self.next_tick();
        let (used, script) = self.entries.get_mut(&key)?;
        self.recency.remove(&*used);
        *used = tick;
        let script = script.clone();
        self.recency.insert(tick, key);
        Some(script)
    }

    pub(crate) fn put(&mut self, script: Arc<Script>) {
        if self.capacity == 0 {
            return;
        }
        let key = (script.name.clone(), script.source.clone());
        if let Some((used, _)) = self.entries.remove(&key) {
            self.recency.remove(&used);
        }
        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            trace!(script = %oldest.0, "evicting compiled script");
            self.entries.remove(&oldest);
        }
        let tick = self.next_tick();
        self.recency.insert(tick, key.clone());
        self.entries.insert(key, (tick, script));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
