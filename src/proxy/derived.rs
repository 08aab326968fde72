use super::{AccessSurface, ArrayObject, Backing, FieldAccess, FieldIter, Lookup, exists_in};
use crate::config::ProxyConfig;
use crate::core::{Key, Result, Value};
use crate::sort::Comparator;
use crate::storage::Collection;
use indexmap::IndexMap;

/// Fields declared on a specialized proxy type.
///
/// A declared name stays declared for the proxy's lifetime. Removing it
/// clears the slot; the name keeps shadowing the backing field.
#[derive(Debug, Clone, Default)]
pub struct OwnFields {
    slots: IndexMap<String, Option<Value>>,
}

impl OwnFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with an initial value
    pub fn declare(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.slots.insert(name.to_string(), Some(value.into()));
        self
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// `None` for undeclared names, `Some(None)` for a cleared slot
    pub fn slot(&self, name: &str) -> Option<Option<&Value>> {
        self.slots.get(name).map(Option::as_ref)
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }

    fn set(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.slots.get_mut(name) {
            *slot = Some(value);
        }
    }

    fn clear(&mut self, name: &str) {
        if let Some(slot) = self.slots.get_mut(name) {
            *slot = None;
        }
    }
}

/// Proxy whose own declared fields take precedence over the backing for
/// read, write, existence checks and removal. Iteration still walks the
/// backing only.
///
/// ```
/// use fieldbag::{DerivedArrayObject, Entity, FieldAccess, OwnFields, Value};
///
/// let c = Entity::with_fields("C", [("prop", "C::prop.orig")]).into_shared();
/// let own = OwnFields::new().declare("prop", "MyArrayObject::prop.orig");
/// let ao = DerivedArrayObject::new(Value::Object(c), "MyArrayObject", own)?;
///
/// assert_eq!(ao.prop("prop")?.into_value_or_null(), Value::from("MyArrayObject::prop.orig"));
/// let first = ao.iterate()?.next().transpose()?;
/// assert_eq!(first.map(|(_, v)| v), Some(Value::from("C::prop.orig")));
/// # Ok::<(), fieldbag::BagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DerivedArrayObject {
    base: ArrayObject,
    own: OwnFields,
}

impl DerivedArrayObject {
    pub fn new(value: Value, class_name: &str, own: OwnFields) -> Result<Self> {
        Self::with_config(value, ProxyConfig::default().class_name(class_name), own)
    }

    pub fn with_config(value: Value, config: ProxyConfig, own: OwnFields) -> Result<Self> {
        Ok(Self {
            base: ArrayObject::with_config(value, config)?,
            own,
        })
    }

    pub fn own_fields(&self) -> &OwnFields {
        &self.own
    }

    pub fn backing(&self) -> &Backing {
        self.base.backing()
    }

    pub fn class_name(&self) -> &str {
        self.base.class_name()
    }

    pub fn count(&self) -> Result<usize> {
        self.base.count()
    }

    pub fn append(&mut self, value: Value) -> Result<Key> {
        self.base.append(value)
    }

    pub fn array_copy(&self) -> Result<Collection> {
        self.base.array_copy()
    }

    pub fn uasort(&mut self, comparator: &Comparator) -> bool {
        self.base.uasort(comparator)
    }

    pub fn uksort(&mut self, comparator: &Comparator) -> bool {
        self.base.uksort(comparator)
    }

    pub fn asort(&mut self) -> bool {
        self.base.asort()
    }

    pub fn ksort(&mut self) -> bool {
        self.base.ksort()
    }

    /// Own slot first, then the backing; no diagnostics
    fn resolve(&self, key: &Key) -> Result<Lookup> {
        match self.own.slot(&own_name(key)) {
            Some(slot) => Ok(slot.cloned().into()),
            None => self.base.resolve(key),
        }
    }
}

/// Declared fields are named by strings on both surfaces.
fn own_name(key: &Key) -> String {
    key.to_string()
}

impl FieldAccess for DerivedArrayObject {
    fn read(&self, key: &Key, surface: AccessSurface) -> Result<Lookup> {
        let lookup = self.resolve(key)?;
        if !lookup.is_found() {
            self.base.report_undefined(key, surface);
        }
        Ok(lookup)
    }

    fn write(&mut self, key: Key, value: Value, surface: AccessSurface) -> Result<()> {
        let name = own_name(&key);
        if self.own.is_declared(&name) {
            self.own.set(&name, value);
            return Ok(());
        }
        self.base.write(key, value, surface)
    }

    fn exists(&self, key: &Key, _surface: AccessSurface) -> Result<bool> {
        Ok(exists_in(&self.resolve(key)?))
    }

    fn remove(&mut self, key: &Key, surface: AccessSurface) -> Result<()> {
        let name = own_name(key);
        if self.own.is_declared(&name) {
            self.own.clear(&name);
            return Ok(());
        }
        self.base.remove(key, surface)
    }

    fn iterate(&self) -> Result<FieldIter> {
        self.base.iterate()
    }
}
