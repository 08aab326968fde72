// ============================================================================
// fieldbag Library
// ============================================================================
//
// Shared field bags (objects and keyed collections), proxies that expose a
// bag through property-style and keyed access, and a key-preserving stable
// sort that commits into the caller's storage.
//
// ============================================================================

pub mod config;
pub mod core;
pub mod json;
pub mod proxy;
pub mod sort;
pub mod storage;

// Re-export main types for convenience
pub use config::ProxyConfig;
pub use crate::core::{BagError, Key, Result, Value};
pub use proxy::{
    AccessSurface, ArrayObject, Backing, DerivedArrayObject, FieldAccess, FieldIter, Lookup,
    OwnFields,
};
pub use sort::{
    AssocSorter, Comparator, FunctionTable, SortBy, asort, ksort, uasort, uasort_shared, uksort,
    uksort_shared,
};
pub use storage::{Collection, CollectionRef, Entity, EntityRef, FieldBag, HasFields, Shared};
