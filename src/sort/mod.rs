// ============================================================================
// src/sort/mod.rs - Key-preserving stable sorting of field bags
// ============================================================================
//
// The (key, value) pairs are copied into a working vector, sorted there and
// swapped back into the caller's storage only when every comparison
// succeeded. A failing comparator therefore never leaves a half-sorted
// collection behind.
//
// For shared storage the comparator runs while no borrow is held. If it
// mutates the storage being sorted, the modification counter changes and
// the commit is refused.
//
// ============================================================================

pub mod comparator;
mod merge;

pub use comparator::{Comparator, FunctionTable, OrderingFn, UserFn, ordering_from_result};

use crate::config::ProxyConfig;
use crate::core::{BagError, Key, Result, Value};
use crate::storage::{Collection, HasFields, Shared};
use log::debug;

/// What the comparator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Values,
    Keys,
}

/// Sorts field bags in place, keeping every key attached to its value.
#[derive(Debug, Clone, Default)]
pub struct AssocSorter {
    config: ProxyConfig,
}

impl AssocSorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProxyConfig) -> Self {
        Self { config }
    }

    /// Sort storage the caller owns exclusively
    pub fn sort_owned<T: HasFields>(
        &self,
        target: &mut T,
        by: SortBy,
        comparator: &Comparator,
    ) -> Result<()> {
        let sorted = self.sort_pairs(target.fields().pairs(), by, comparator)?;
        target.fields_mut().replace_order(sorted)
    }

    /// Sort storage behind a shared handle
    pub fn sort_shared<T: HasFields>(
        &self,
        target: &Shared<T>,
        by: SortBy,
        comparator: &Comparator,
    ) -> Result<()> {
        let (pairs, version) = {
            let guard = target.read()?;
            (guard.fields().pairs(), guard.fields().version())
        };

        let sorted = self.sort_pairs(pairs, by, comparator)?;

        let mut guard = target.write()?;
        if guard.fields().version() != version {
            return Err(BagError::ConcurrentModification(
                "collection changed while its comparator was running".into(),
            ));
        }
        guard.fields_mut().replace_order(sorted)
    }

    fn sort_pairs(
        &self,
        pairs: Vec<(Key, Value)>,
        by: SortBy,
        comparator: &Comparator,
    ) -> Result<Vec<(Key, Value)>> {
        comparator.ensure_invocable()?;

        let threshold = self.config.insertion_sort_threshold;
        match by {
            SortBy::Values => merge::stable_sort_by(pairs, threshold, |(_, a), (_, b)| {
                comparator.compare(a, b).map_err(into_comparator_failure)
            }),
            SortBy::Keys => merge::stable_sort_by(pairs, threshold, |(a, _), (b, _)| {
                comparator.compare_keys(a, b).map_err(into_comparator_failure)
            }),
        }
    }
}

/// Errors raised inside a comparator abort the sort as `ComparatorFailed`;
/// an uninvocable comparator keeps its own kind.
fn into_comparator_failure(err: BagError) -> BagError {
    match err {
        BagError::ComparatorInvocation(_) | BagError::ComparatorFailed(_) => err,
        other => BagError::ComparatorFailed(other.to_string()),
    }
}

fn report(operation: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!("{}() aborted, collection left unchanged: {}", operation, err);
            false
        }
    }
}

// ============================================================================
// Caller-facing entry points: success flag, storage sorted in place
// ============================================================================

/// Sort by value with a user comparator, keeping keys attached
pub fn uasort(collection: &mut Collection, comparator: &Comparator) -> bool {
    report("uasort", AssocSorter::new().sort_owned(collection, SortBy::Values, comparator))
}

/// Sort by key with a user comparator
pub fn uksort(collection: &mut Collection, comparator: &Comparator) -> bool {
    report("uksort", AssocSorter::new().sort_owned(collection, SortBy::Keys, comparator))
}

/// Sort by value with the built-in value ordering
pub fn asort(collection: &mut Collection) -> bool {
    let result = AssocSorter::new().sort_owned(collection, SortBy::Values, &Comparator::Builtin);
    report("asort", result)
}

/// Sort by key with the built-in key ordering
pub fn ksort(collection: &mut Collection) -> bool {
    let result = AssocSorter::new().sort_owned(collection, SortBy::Keys, &Comparator::Builtin);
    report("ksort", result)
}

/// `uasort` for storage reachable through a shared handle
pub fn uasort_shared<T: HasFields>(target: &Shared<T>, comparator: &Comparator) -> bool {
    report("uasort", AssocSorter::new().sort_shared(target, SortBy::Values, comparator))
}

/// `uksort` for storage reachable through a shared handle
pub fn uksort_shared<T: HasFields>(target: &Shared<T>, comparator: &Comparator) -> bool {
    report("uksort", AssocSorter::new().sort_shared(target, SortBy::Keys, comparator))
}

pub(crate) fn report_shared<T: HasFields>(
    sorter: &AssocSorter,
    operation: &str,
    target: &Shared<T>,
    by: SortBy,
    comparator: &Comparator,
) -> bool {
    report(operation, sorter.sort_shared(target, by, comparator))
}
