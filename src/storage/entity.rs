use super::{FieldBag, HasFields, Shared};
use crate::core::{Key, Value};

pub type EntityRef = Shared<Entity>;

/// Object-like bag of named fields.
///
/// Field names are kept verbatim; `"0"` and `0` are different names only
/// for keyed collections, never here.
#[derive(Debug, Clone)]
pub struct Entity {
    class: String,
    fields: FieldBag,
}

impl Entity {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: FieldBag::new(),
        }
    }

    /// Declare fields in order, like a class body with default values.
    pub fn with_fields<I, K, V>(class: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entity = Self::new(class);
        for (name, value) in fields {
            entity.set(name, value);
        }
        entity
    }

    pub fn into_shared(self) -> EntityRef {
        Shared::new(self)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(&Key::Str(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains(&Key::Str(name.to_string()))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(Key::Str(name.into()), value.into())
    }

    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(&Key::Str(name.to_string()))
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(k, _)| k.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl HasFields for Entity {
    fn fields(&self) -> &FieldBag {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldBag {
        &mut self.fields
    }
}
