//! # Set Algebra
//!
//! Operations on working sets: sorted sequences of row positions, ordered by
//! a key projection. A working set never contains two rows with equal keys,
//! so all comparisons below are strict inside a set.
//!
//! Merge intersection is the default strategy; the divide-and-conquer variant
//! is an alternative behind the same contract, kept for skewed block-size
//! ratios and verified equivalent by tests.

use crate::index::{SortKey, SortedIndex};
use crate::relation::TripleTable;
use std::cmp::Ordering;

// =============================================================================
// MEMBERSHIP
// =============================================================================

/// Binary-search membership of a block slot in a set sorted by that index's
/// key. O(log m).
#[must_use]
pub fn contains_slot(idx: &SortedIndex, set: &[u32], slot: usize) -> bool {
    set.binary_search_by(|&row| idx.slot_of(row).cmp(&slot)).is_ok()
}

// =============================================================================
// MERGE INTERSECTION
// =============================================================================

/// Intersect `acc` in place with `block`, both sorted by `key` over `table`.
///
/// Single pass, O(|acc| + |block|). Survivors are taken from `block`, so the
/// result's row positions always come from the most recently intersected
/// block (the representative convention the closure operator relies on).
pub fn merge_intersect<T: TripleTable>(
    table: &T,
    key: SortKey,
    acc: &mut Vec<u32>,
    block: &[u32],
) {
    let mut out = 0usize;
    let mut i = 0usize;
    let mut j = 0usize;
    while i < acc.len() && j < block.len() {
        match key.cmp_rows(table, acc[i], block[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                acc[out] = block[j];
                out += 1;
                i += 1;
                j += 1;
            }
        }
    }
    acc.truncate(out);
}

// =============================================================================
// DIVIDE-AND-CONQUER INTERSECTION
// =============================================================================

/// Intersect two key-sorted sets by recursive bisection: split `probe` at its
/// midpoint, binary-search the midpoint in `block`, recurse on both halves.
///
/// Correctness-equivalent to [`merge_intersect`] (same representative
/// convention: survivors come from `block`); asymptotically better when the
/// operand sizes are strongly skewed.
#[must_use]
pub fn bisect_intersect<T: TripleTable>(
    table: &T,
    key: SortKey,
    probe: &[u32],
    block: &[u32],
) -> Vec<u32> {
    let mut result = Vec::with_capacity(probe.len().min(block.len()));
    bisect_into(table, key, probe, block, &mut result);
    result
}

fn bisect_into<T: TripleTable>(
    table: &T,
    key: SortKey,
    probe: &[u32],
    block: &[u32],
    result: &mut Vec<u32>,
) {
    if probe.is_empty() || block.is_empty() {
        return;
    }
    let mid = probe.len() / 2;
    let pivot = probe[mid];
    match block.binary_search_by(|&row| key.cmp_rows(table, row, pivot)) {
        Ok(pos) => {
            bisect_into(table, key, &probe[..mid], &block[..pos], result);
            result.push(block[pos]);
            bisect_into(table, key, &probe[mid + 1..], &block[pos + 1..], result);
        }
        Err(pos) => {
            bisect_into(table, key, &probe[..mid], &block[..pos], result);
            bisect_into(table, key, &probe[mid + 1..], &block[pos..], result);
        }
    }
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// True if every key of `a` occurs in `b`; both sorted by `key`. O(|a| + |b|).
#[must_use]
pub fn is_subset<T: TripleTable>(table: &T, key: SortKey, a: &[u32], b: &[u32]) -> bool {
    let mut j = 0usize;
    'outer: for &row in a {
        while j < b.len() {
            match key.cmp_rows(table, b[j], row) {
                Ordering::Less => j += 1,
                Ordering::Equal => {
                    j += 1;
                    continue 'outer;
                }
                Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

// =============================================================================
// TESTS
// =============================================================================
