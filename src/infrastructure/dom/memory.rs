//! In-memory element store

use std::collections::HashMap;

use crate::core::templates::ElementStore;

/// Element texts held in a map, for tests and programmatic hosts
#[derive(Debug, Default, Clone)]
pub struct MemoryElementStore {
    elements: HashMap<String, String>,
}

impl MemoryElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the element with `element_id`
    pub fn insert(&mut self, element_id: impl Into<String>, text: impl Into<String>) {
        self.elements.insert(element_id.into(), text.into());
    }

    pub fn remove(&mut self, element_id: &str) -> Option<String> {
        self.elements.remove(element_id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ElementStore for MemoryElementStore {
    fn element_text(&self, element_id: &str) -> Option<String> {
        self.elements.get(element_id).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryElementStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (id, text) in iter {
            store.insert(id, text);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lookup_remove() {
        let mut store = MemoryElementStore::new();
        assert!(store.is_empty());
        store.insert("template-a", "<%= data %>");

        assert_eq!(store.element_text("template-a").as_deref(), Some("<%= data %>"));
        assert_eq!(store.element_text("template-b"), None);
        assert_eq!(store.remove("template-a").as_deref(), Some("<%= data %>"));
        assert_eq!(store.element_text("template-a"), None);
    }

    #[test]
    fn test_from_iter() {
        let store: MemoryElementStore = [("template-a", "a"), ("template-b", "b")]
            .into_iter()
            .collect();
        assert_eq!(store.len(), 2);
        assert_eq!(store.element_text("template-b").as_deref(), Some("b"));
    }
}
