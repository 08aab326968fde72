use crate::core::{BagError, Key, Result, Value};
use indexmap::IndexMap;

/// Insertion-ordered map of fields.
///
/// Every mutation bumps `version`, which lets a sort detect that the bag
/// changed underneath it.
#[derive(Debug, Clone, Default)]
pub struct FieldBag {
    entries: IndexMap<Key, Value>,
    next_index: i64,
    version: u64,
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&Key, &Value)> {
        self.entries.get_index(index)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Key::Int(i) = key
            && i >= self.next_index
        {
            self.next_index = i.saturating_add(1);
        }
        self.version += 1;
        self.entries.insert(key, value)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Append under the next free integer key.
    pub fn push(&mut self, value: Value) -> Result<Key> {
        if self.next_index == i64::MAX && self.contains(&Key::Int(i64::MAX)) {
            return Err(BagError::UnsupportedOperation(
                "Cannot add element: next index is already occupied".into(),
            ));
        }
        let key = Key::Int(self.next_index);
        self.insert(key.clone(), value);
        Ok(key)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.keys().cloned().collect()
    }

    pub fn pairs(&self) -> Vec<(Key, Value)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the entry order with `pairs`, which must be a permutation of
    /// the current entries' keys.
    pub fn replace_order(&mut self, pairs: Vec<(Key, Value)>) -> Result<()> {
        if pairs.len() != self.entries.len() || !pairs.iter().all(|(k, _)| self.contains(k)) {
            return Err(BagError::ConcurrentModification(
                "reordered pairs do not match the current keys".into(),
            ));
        }
        let reordered: IndexMap<Key, Value> = pairs.into_iter().collect();
        if reordered.len() != self.entries.len() {
            return Err(BagError::ConcurrentModification(
                "reordered pairs contain duplicate keys".into(),
            ));
        }
        self.entries = reordered;
        self.version += 1;
        Ok(())
    }
}
