use super::{AccessSurface, Backing, FieldAccess, FieldIter, Lookup, exists_in};
use crate::config::ProxyConfig;
use crate::core::{Key, Result, Value};
use crate::sort::{AssocSorter, Comparator, SortBy, report_shared};
use crate::storage::Collection;
use log::warn;

/// Pass-through proxy: every operation goes straight to the backing.
///
/// ```
/// use fieldbag::{ArrayObject, Entity, FieldAccess, Value};
///
/// let c = Entity::with_fields("C", [("prop", "C::prop.orig")]).into_shared();
/// let mut ao = ArrayObject::new(Value::Object(c.clone()))?;
///
/// ao.set_prop("prop", Value::from("changed1"))?;
/// assert_eq!(c.read()?.get("prop"), Some(&Value::from("changed1")));
/// # Ok::<(), fieldbag::BagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArrayObject {
    backing: Backing,
    config: ProxyConfig,
}

impl ArrayObject {
    /// Bind to an object or keyed collection
    pub fn new(value: Value) -> Result<Self> {
        Self::with_config(value, ProxyConfig::default())
    }

    pub fn with_config(value: Value, config: ProxyConfig) -> Result<Self> {
        Ok(Self::from_backing(Backing::from_value(&value)?, config))
    }

    pub fn from_backing(backing: Backing, config: ProxyConfig) -> Self {
        Self { backing, config }
    }

    pub fn backing(&self) -> &Backing {
        &self.backing
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn class_name(&self) -> &str {
        &self.config.class_name
    }

    /// Number of backing fields
    pub fn count(&self) -> Result<usize> {
        self.backing.len()
    }

    /// Append under the next integer key; keyed-collection backing only
    pub fn append(&mut self, value: Value) -> Result<Key> {
        self.backing.push(value)
    }

    /// Detached copy of the backing fields
    pub fn array_copy(&self) -> Result<Collection> {
        Ok(Collection::from_pairs(self.backing.pairs()?))
    }

    // ========================================================================
    // Sorting the backing in place
    // ========================================================================

    pub fn uasort(&mut self, comparator: &Comparator) -> bool {
        self.sort_backing("uasort", SortBy::Values, comparator)
    }

    pub fn uksort(&mut self, comparator: &Comparator) -> bool {
        self.sort_backing("uksort", SortBy::Keys, comparator)
    }

    pub fn asort(&mut self) -> bool {
        self.sort_backing("asort", SortBy::Values, &Comparator::Builtin)
    }

    pub fn ksort(&mut self) -> bool {
        self.sort_backing("ksort", SortBy::Keys, &Comparator::Builtin)
    }

    fn sort_backing(&self, operation: &str, by: SortBy, comparator: &Comparator) -> bool {
        let sorter = AssocSorter::with_config(self.config.clone());
        match &self.backing {
            Backing::Object(entity) => report_shared(&sorter, operation, entity, by, comparator),
            Backing::Array(collection) => {
                report_shared(&sorter, operation, collection, by, comparator)
            }
        }
    }

    // ========================================================================
    // Shared with DerivedArrayObject
    // ========================================================================

    /// Backing lookup without diagnostics
    pub(crate) fn resolve(&self, key: &Key) -> Result<Lookup> {
        Ok(self.backing.get(key)?.into())
    }

    /// Log the undefined-access warning for `surface`. Returns the message,
    /// or `None` when warnings are disabled.
    pub(crate) fn report_undefined(&self, key: &Key, surface: AccessSurface) -> Option<String> {
        if !self.config.warn_on_undefined {
            return None;
        }
        let message = undefined_message(&self.config.class_name, key, surface);
        warn!("{}", message);
        Some(message)
    }
}

/// Diagnostic for reading an undefined field through `surface`.
pub(crate) fn undefined_message(class_name: &str, key: &Key, surface: AccessSurface) -> String {
    match surface {
        AccessSurface::Property => format!("Undefined property: {}::${}", class_name, key),
        AccessSurface::Keyed => format!("Undefined {}: {}", surface, key),
    }
}

impl TryFrom<Value> for ArrayObject {
    type Error = crate::core::BagError;

    fn try_from(value: Value) -> Result<Self> {
        Self::new(value)
    }
}

impl FieldAccess for ArrayObject {
    fn read(&self, key: &Key, surface: AccessSurface) -> Result<Lookup> {
        let lookup = self.resolve(key)?;
        if !lookup.is_found() {
            self.report_undefined(key, surface);
        }
        Ok(lookup)
    }

    fn write(&mut self, key: Key, value: Value, _surface: AccessSurface) -> Result<()> {
        self.backing.set(key, value)
    }

    fn exists(&self, key: &Key, _surface: AccessSurface) -> Result<bool> {
        Ok(exists_in(&self.resolve(key)?))
    }

    fn remove(&mut self, key: &Key, _surface: AccessSurface) -> Result<()> {
        self.backing.unset(key)?;
        Ok(())
    }

    fn iterate(&self) -> Result<FieldIter> {
        FieldIter::new(self.backing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BagError;
    use crate::storage::Entity;

    fn proxy_over_c() -> (crate::storage::EntityRef, ArrayObject) {
        let c = Entity::with_fields("C", [("prop", "C::prop.orig")]).into_shared();
        let ao = ArrayObject::new(Value::Object(c.clone())).unwrap();
        (c, ao)
    }

    #[test]
    fn test_construct_rejects_scalars() {
        let err = ArrayObject::new(Value::from(42)).unwrap_err();
        assert!(matches!(err, BagError::TypeMismatch(_)));
        assert!(ArrayObject::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_both_surfaces_read_the_same_field() {
        let (_c, ao) = proxy_over_c();
        assert_eq!(ao.prop("prop").unwrap(), Lookup::Found(Value::from("C::prop.orig")));
        assert_eq!(ao.offset_get(&Key::from("prop")).unwrap(), ao.prop("prop").unwrap());
    }

    #[test]
    fn test_write_creates_missing_fields_in_backing() {
        let (c, mut ao) = proxy_over_c();
        ao.offset_set(Key::from("extra"), Value::from(1)).unwrap();
        assert_eq!(c.read().unwrap().get("extra"), Some(&Value::from(1)));
    }

    #[test]
    fn test_null_field_is_found_but_not_set() {
        let (c, ao) = proxy_over_c();
        c.write().unwrap().set("nothing", Value::Null);
        assert_eq!(ao.prop("nothing").unwrap(), Lookup::Found(Value::Null));
        assert!(!ao.isset_prop("nothing").unwrap());
        assert!(!ao.offset_exists(&Key::from("nothing")).unwrap());
    }

    #[test]
    fn test_remove_then_read_is_absent() {
        let (c, mut ao) = proxy_over_c();
        ao.unset_prop("prop").unwrap();
        assert_eq!(ao.prop("prop").unwrap(), Lookup::Absent);
        assert_eq!(ao.offset_get(&Key::from("prop")).unwrap(), Lookup::Absent);
        assert!(!c.read().unwrap().has("prop"));
        // removing again is a no-op
        ao.offset_unset(&Key::from("prop")).unwrap();
    }

    #[test]
    fn test_count_and_copy() {
        let (c, ao) = proxy_over_c();
        assert_eq!(ao.count().unwrap(), 1);

        let copy = ao.array_copy().unwrap();
        c.write().unwrap().set("prop", "after copy");
        assert_eq!(copy.get("prop"), Some(&Value::from("C::prop.orig")));
    }

    #[test]
    fn test_append_only_on_collections() {
        let (_c, mut ao) = proxy_over_c();
        assert!(ao.append(Value::from(1)).is_err());

        let list = Collection::from_values([1, 2]).into_shared();
        let mut ao = ArrayObject::new(Value::Array(list.clone())).unwrap();
        assert_eq!(ao.append(Value::from(3)).unwrap(), Key::Int(2));
        assert_eq!(list.read().unwrap().len(), 3);
    }

    #[test]
    fn test_undefined_messages_per_surface() {
        let key = Key::from("missing");
        assert_eq!(
            undefined_message("ArrayObject", &key, AccessSurface::Property),
            "Undefined property: ArrayObject::$missing"
        );
        assert_eq!(
            undefined_message("ArrayObject", &key, AccessSurface::Keyed),
            "Undefined index: missing"
        );
        assert_eq!(
            undefined_message("ArrayObject", &Key::Int(3), AccessSurface::Keyed),
            "Undefined index: 3"
        );
    }

    #[test]
    fn test_report_undefined_uses_configured_class() {
        let (_c, ao) = proxy_over_c();
        assert_eq!(
            ao.report_undefined(&Key::from("nope"), AccessSurface::Property),
            Some("Undefined property: ArrayObject::$nope".to_string())
        );
        assert_eq!(
            ao.report_undefined(&Key::from("nope"), AccessSurface::Keyed),
            Some("Undefined index: nope".to_string())
        );
    }

    #[test]
    fn test_disabled_warnings_report_nothing() {
        let c = Entity::new("C").into_shared();
        let config = ProxyConfig::new().warn_on_undefined(false);
        let ao = ArrayObject::with_config(Value::Object(c), config).unwrap();

        assert_eq!(ao.report_undefined(&Key::from("nope"), AccessSurface::Property), None);
        assert_eq!(ao.report_undefined(&Key::from("nope"), AccessSurface::Keyed), None);
        assert_eq!(ao.prop("nope").unwrap(), Lookup::Absent);
    }

    #[test]
    fn test_borrow_conflict_surfaces_as_error() {
        let (c, ao) = proxy_over_c();
        let _guard = c.write().unwrap();
        assert!(matches!(ao.prop("prop"), Err(BagError::BorrowConflict(_))));
    }
}
