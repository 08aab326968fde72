// ============================================================================
// src/sort/merge.rs - Stable merge sort with a fallible comparator
// ============================================================================
//
// Short runs are insertion-sorted, then merged bottom-up. Elements move only
// when the comparator answers `Greater`, so equal elements keep their input
// order. Every step permutes indices, so an inconsistent comparator can only
// produce an unusual order, never lose or duplicate an element, and every
// loop is bounded by the input length.
//
// ============================================================================

use crate::core::Result;
use std::cmp::Ordering;

/// Sort `items` with `compare`, aborting on the first comparator error.
pub(crate) fn stable_sort_by<T, F>(
    items: Vec<T>,
    run_len: usize,
    mut compare: F,
) -> Result<Vec<T>>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    let len = items.len();
    if len < 2 {
        return Ok(items);
    }

    let run_len = run_len.max(1);
    let mut order: Vec<usize> = (0..len).collect();

    for start in (0..len).step_by(run_len) {
        let end = (start + run_len).min(len);
        insertion_sort(&items, &mut order[start..end], &mut compare)?;
    }

    let mut buffer = Vec::with_capacity(len);
    let mut width = run_len;
    while width < len {
        buffer.clear();
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(&items, &order[start..mid], &order[mid..end], &mut buffer, &mut compare)?;
        }
        std::mem::swap(&mut order, &mut buffer);
        width *= 2;
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn insertion_sort<T, F>(items: &[T], run: &mut [usize], compare: &mut F) -> Result<()>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    for i in 1..run.len() {
        let mut j = i;
        while j > 0 && compare(&items[run[j - 1]], &items[run[j]])? == Ordering::Greater {
            run.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}

fn merge<T, F>(
    items: &[T],
    left: &[usize],
    right: &[usize],
    out: &mut Vec<usize>,
    compare: &mut F,
) -> Result<()>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    let (mut l, mut r) = (0, 0);
    while l < left.len() && r < right.len() {
        if compare(&items[left[l]], &items[right[r]])? == Ordering::Greater {
            out.push(right[r]);
            r += 1;
        } else {
            out.push(left[l]);
            l += 1;
        }
    }
    out.extend_from_slice(&left[l..]);
    out.extend_from_slice(&right[r..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BagError;

    fn by_first(a: &(i32, char), b: &(i32, char)) -> Result<Ordering> {
        Ok(a.0.cmp(&b.0))
    }

    #[test]
    fn test_sorts_across_runs() {
        let items: Vec<i32> = (0..50).rev().collect();
        let sorted = stable_sort_by(items, 4, |a, b| Ok(a.cmp(b))).unwrap();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_equal_elements_keep_input_order() {
        let items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (2, 'e'), (0, 'f')];
        for run_len in [1, 2, 3, 16] {
            let sorted = stable_sort_by(items.clone(), run_len, by_first).unwrap();
            assert_eq!(
                sorted,
                vec![(0, 'f'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c'), (2, 'e')]
            );
        }
    }

    #[test]
    fn test_comparator_error_aborts() {
        let mut calls = 0;
        let err = stable_sort_by(vec![3, 2, 1], 16, |_, _| {
            calls += 1;
            Err(BagError::ComparatorFailed("boom".into()))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, BagError::ComparatorFailed(_)));
    }

    #[test]
    fn test_inconsistent_comparator_yields_permutation() {
        let items: Vec<i32> = (0..40).collect();
        let mut flip = false;
        let mut sorted = stable_sort_by(items, 3, |_, _| {
            flip = !flip;
            Ok(if flip { Ordering::Greater } else { Ordering::Less })
        })
        .unwrap();
        sorted.sort();
        assert_eq!(sorted, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_trivial_inputs() {
        let empty: Vec<i32> = Vec::new();
        let sorted = stable_sort_by(empty, 16, |a: &i32, b: &i32| Ok(a.cmp(b))).unwrap();
        assert!(sorted.is_empty());
        assert_eq!(stable_sort_by(vec![7], 16, |_, _| unreachable!()).unwrap(), vec![7]);
    }
}
