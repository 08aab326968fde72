use crate::core::{BagError, Key, Result, Value};
use crate::storage::{CollectionRef, EntityRef, FieldBag, HasFields};

/// The field bag a proxy is bound to. Holds a handle, never a copy.
#[derive(Debug, Clone)]
pub enum Backing {
    Object(EntityRef),
    Array(CollectionRef),
}

impl Backing {
    /// Accepts objects and keyed collections; anything else is a `TypeMismatch`.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(entity) => Ok(Self::Object(entity.clone())),
            Value::Array(collection) => Ok(Self::Array(collection.clone())),
            other => Err(BagError::TypeMismatch(format!(
                "Passed variable is not an array or object, {} given",
                other.type_name()
            ))),
        }
    }

    /// Handle to the same storage, as a `Value`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(entity) => Value::Object(entity.clone()),
            Self::Array(collection) => Value::Array(collection.clone()),
        }
    }

    /// Whether `value` refers to this very storage.
    pub fn is_same(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Self::Array(a), Value::Array(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn get(&self, key: &Key) -> Result<Option<Value>> {
        let key = self.canonical(key.clone());
        self.with_fields(|bag| bag.get(&key).cloned())
    }

    pub fn contains(&self, key: &Key) -> Result<bool> {
        let key = self.canonical(key.clone());
        self.with_fields(|bag| bag.contains(&key))
    }

    pub fn set(&self, key: Key, value: Value) -> Result<()> {
        let key = self.canonical(key);
        self.with_fields_mut(|bag| {
            bag.insert(key, value);
        })
    }

    pub fn unset(&self, key: &Key) -> Result<bool> {
        let key = self.canonical(key.clone());
        self.with_fields_mut(|bag| bag.remove(&key).is_some())
    }

    pub fn push(&self, value: Value) -> Result<Key> {
        match self {
            Self::Array(collection) => collection.write()?.push(value),
            Self::Object(_) => Err(BagError::UnsupportedOperation(
                "Cannot append properties to objects, use set_prop() instead".into(),
            )),
        }
    }

    pub fn keys(&self) -> Result<Vec<Key>> {
        self.with_fields(FieldBag::keys)
    }

    pub fn pairs(&self) -> Result<Vec<(Key, Value)>> {
        self.with_fields(FieldBag::pairs)
    }

    pub fn len(&self) -> Result<usize> {
        self.with_fields(FieldBag::len)
    }

    /// Keyed collections address `"3"` and `3` alike. Entity fields are
    /// always named by strings, kept verbatim.
    fn canonical(&self, key: Key) -> Key {
        match (self, key) {
            (Self::Object(_), Key::Int(i)) => Key::Str(i.to_string()),
            (Self::Object(_), key) => key,
            (Self::Array(_), key) => key.normalized(),
        }
    }

    fn with_fields<R>(&self, f: impl FnOnce(&FieldBag) -> R) -> Result<R> {
        match self {
            Self::Object(entity) => Ok(f(entity.read()?.fields())),
            Self::Array(collection) => Ok(f(collection.read()?.fields())),
        }
    }

    fn with_fields_mut<R>(&self, f: impl FnOnce(&mut FieldBag) -> R) -> Result<R> {
        match self {
            Self::Object(entity) => Ok(f(entity.write()?.fields_mut())),
            Self::Array(collection) => Ok(f(collection.write()?.fields_mut())),
        }
    }
}
