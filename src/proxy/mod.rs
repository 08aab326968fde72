// ============================================================================
// src/proxy/mod.rs - Dual-access proxies over shared field bags
// ============================================================================
//
// A proxy answers two surfaces, property-style (`x.field`) and keyed
// (`x[key]`). Both surfaces are thin wrappers over the same `FieldAccess`
// operations; only the diagnostic for an undefined name depends on the
// surface.
//
// ============================================================================

pub mod array_object;
pub mod backing;
pub mod derived;
pub mod iter;

pub use array_object::ArrayObject;
pub use backing::Backing;
pub use derived::{DerivedArrayObject, OwnFields};
pub use iter::FieldIter;

use crate::core::{Key, Result, Value};
use std::fmt;

/// Which syntax a request came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSurface {
    /// `x.field`
    Property,
    /// `x[key]`
    Keyed,
}

impl fmt::Display for AccessSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => write!(f, "property"),
            Self::Keyed => write!(f, "index"),
        }
    }
}

/// Outcome of a read. `Absent` is the soft "undefined" signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    Absent,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<Value> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// Warning-and-null style: absent reads evaluate to `Null`.
    pub fn into_value_or_null(self) -> Value {
        self.into_option().unwrap_or(Value::Null)
    }
}

impl From<Option<Value>> for Lookup {
    fn from(v: Option<Value>) -> Self {
        match v {
            Some(v) => Self::Found(v),
            None => Self::Absent,
        }
    }
}

/// The operations every proxy provides.
///
/// Implementors supply `read`/`write`/`exists`/`remove`/`iterate`; the
/// property and keyed surfaces are provided on top and never bypass them.
pub trait FieldAccess {
    fn read(&self, key: &Key, surface: AccessSurface) -> Result<Lookup>;

    fn write(&mut self, key: Key, value: Value, surface: AccessSurface) -> Result<()>;

    /// Present and not null.
    fn exists(&self, key: &Key, surface: AccessSurface) -> Result<bool>;

    fn remove(&mut self, key: &Key, surface: AccessSurface) -> Result<()>;

    /// Backing fields only, in the backing's order at the time of the call.
    fn iterate(&self) -> Result<FieldIter>;

    // ------------------------------------------------------------------
    // Property surface
    // ------------------------------------------------------------------

    fn prop(&self, name: &str) -> Result<Lookup> {
        self.read(&Key::from(name), AccessSurface::Property)
    }

    fn set_prop(&mut self, name: &str, value: Value) -> Result<()> {
        self.write(Key::from(name), value, AccessSurface::Property)
    }

    fn isset_prop(&self, name: &str) -> Result<bool> {
        self.exists(&Key::from(name), AccessSurface::Property)
    }

    fn unset_prop(&mut self, name: &str) -> Result<()> {
        self.remove(&Key::from(name), AccessSurface::Property)
    }

    // ------------------------------------------------------------------
    // Keyed surface
    // ------------------------------------------------------------------

    fn offset_get(&self, key: &Key) -> Result<Lookup> {
        self.read(key, AccessSurface::Keyed)
    }

    fn offset_set(&mut self, key: Key, value: Value) -> Result<()> {
        self.write(key, value, AccessSurface::Keyed)
    }

    fn offset_exists(&self, key: &Key) -> Result<bool> {
        self.exists(key, AccessSurface::Keyed)
    }

    fn offset_unset(&mut self, key: &Key) -> Result<()> {
        self.remove(key, AccessSurface::Keyed)
    }
}

pub(crate) fn exists_in(lookup: &Lookup) -> bool {
    lookup.value().is_some_and(|v| !v.is_null())
}
