//! Shared resolution cache keyed by operation and runtime shape.
//!
//! Reads never block each other. Two threads missing on the same key may
//! both introspect; the later insert wins, which is harmless because handles
//! for one key are interchangeable.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use ix_core::{Shape, Value};

use crate::handle::AccessorHandle;
use crate::iteration::IterationStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Iterate,
    Method,
    PropertyGet,
    PropertySet,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub kind: OperationKind,
    pub name: String,
    pub shape: Shape,
    /// Argument shapes for calls, the new value's shape for setters.
    pub args: Vec<Shape>,
}

impl ResolutionKey {
    pub fn new(kind: OperationKind, name: &str, value: &Value, args: &[Value]) -> Self {
        Self {
            kind,
            name: name.to_string(),
            shape: Shape::of(value),
            args: Shape::of_all(args),
        }
    }
}

#[derive(Clone)]
pub enum CacheEntry {
    Handle(AccessorHandle),
    Iteration(IterationStrategy),
    /// Resolution failed before; the code and message are replayed.
    Tombstone {
        code: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub tombstone_hits: u64,
    pub entries: usize,
}

#[derive(Default)]
pub struct ResolutionCache {
    entries: DashMap<ResolutionKey, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    tombstone_hits: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<CacheEntry> {
        let entry = self.entries.get(key).map(|entry| entry.value().clone());
        match &entry {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            Some(CacheEntry::Tombstone { .. }) => {
                self.tombstone_hits.fetch_add(1, Ordering::Relaxed);
            }
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
            }
        }
        entry
    }

    pub fn insert(&self, key: ResolutionKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    pub fn remove(&self, key: &ResolutionKey) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            tombstone_hits: self.tombstone_hits.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
