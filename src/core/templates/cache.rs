//! In-memory template caches.
//!
//! Two independent maps keyed by [`CanonicalKey`]: one for raw template source and one
//! for compiled renderers. There is no eviction; both live as long as the
//! [`TemplateManager`](super::TemplateManager) that owns them. Mutation is restricted to
//! the crate so callers can inspect the caches but only change them through
//! `add`, `remove` and `render`.

use std::collections::HashMap;
use std::fmt;

use super::{CanonicalKey, Renderer};

/// Key-value store with last-write-wins semantics
pub struct TemplateCache<V> {
    entries: HashMap<CanonicalKey, V>,
}

impl<V> Default for TemplateCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> TemplateCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached keys in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(CanonicalKey::as_str)
    }

    /// Store `value`, returning the entry it replaced
    pub(crate) fn set(&mut self, key: CanonicalKey, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub(crate) fn delete(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }
}

impl<V> fmt::Debug for TemplateCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("TemplateCache").field("keys", &keys).finish()
    }
}

/// Raw template source by key
pub type SourceCache = TemplateCache<String>;

/// Compiled renderers by key
pub type CompiledCache = TemplateCache<Box<dyn Renderer>>;
