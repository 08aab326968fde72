use super::{FieldBag, HasFields, Shared};
use crate::core::{Key, Result, Value};

pub type CollectionRef = Shared<Collection>;

/// Keyed, ordered collection with integer or string keys.
///
/// Decimal integer strings are stored as integer keys, so `"3"` and `3`
/// address the same entry.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    fields: FieldBag,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// List-style construction: keys 0, 1, 2, ...
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut collection = Self::new();
        for (i, value) in values.into_iter().enumerate() {
            collection.insert(i as i64, value);
        }
        collection
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut collection = Self::new();
        for (key, value) in pairs {
            collection.insert(key, value);
        }
        collection
    }

    pub fn into_shared(self) -> CollectionRef {
        Shared::new(self)
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.fields.get(&key.into().normalized())
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.fields.contains(&key.into().normalized())
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into().normalized(), value.into())
    }

    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.fields.remove(&key.into().normalized())
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<Key> {
        self.fields.push(value.into())
    }

    pub fn keys(&self) -> Vec<Key> {
        self.fields.keys()
    }

    pub fn values(&self) -> Vec<Value> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn pairs(&self) -> Vec<(Key, Value)> {
        self.fields.pairs()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl HasFields for Collection {
    fn fields(&self) -> &FieldBag {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldBag {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_string_keys_alias_integer_keys() {
        let mut c = Collection::new();
        c.insert("3", "three");
        assert_eq!(c.get(3), Some(&Value::from("three")));
        assert!(c.contains("3"));
        assert_eq!(c.keys(), vec![Key::Int(3)]);
    }

    #[test]
    fn test_from_values_is_zero_indexed() {
        let c = Collection::from_values([10, -5, 100]);
        assert_eq!(c.keys(), vec![Key::Int(0), Key::Int(1), Key::Int(2)]);
        assert_eq!(c.get(1), Some(&Value::from(-5)));
    }

    #[test]
    fn test_push_after_sparse_keys() {
        let mut c = Collection::from_pairs([(5, "a")]);
        assert_eq!(c.push("b").unwrap(), Key::Int(6));
    }
}
