//! # Closure Operator
//!
//! The Galois derivation ("prime") and the Next-Closure step primitives
//! shared by the outer and inner enumeration loops.
//!
//! A working set is a `Vec<u32>` of row positions. A set on one side of an
//! index pair represents key values of that side (one representative row per
//! value) and is ordered by the *other* side's key, which is exactly the
//! order the blocks of the queried index store their rows in.

use crate::index::SortedIndex;
use crate::relation::TripleTable;
use crate::set::{contains_slot, merge_intersect};

// =============================================================================
// PRIME
// =============================================================================

/// Galois derivation of `set` (key values of `idx`'s side, given as
/// representative rows) into the dual side.
///
/// The empty set derives to the full dual domain: one representative row per
/// non-empty block of `dual`. Otherwise the element blocks are intersected
/// smallest-first under the dual key; the result rows represent the dual-side
/// key values and are sorted by the dual key, so `prime` composes with itself
/// through the index pair — applying it twice yields the closure (hull).
pub fn prime<T: TripleTable>(
    table: &T,
    idx: &SortedIndex,
    dual: &SortedIndex,
    set: &[u32],
) -> Vec<u32> {
    if set.is_empty() {
        let mut result = Vec::with_capacity(dual.num_blocks());
        for slot in 0..dual.num_blocks() {
            if let Some(&first) = dual.block(slot).first() {
                result.push(first);
            }
        }
        return result;
    }

    // intersect smallest blocks first to keep the running set small
    let mut slots: Vec<usize> = set.iter().map(|&row| idx.slot_of(row)).collect();
    slots.sort_by_key(|&slot| idx.block_len(slot));

    let mut result: Vec<u32> = idx.block(slots[0]).to_vec();
    for &slot in &slots[1..] {
        if result.is_empty() {
            break;
        }
        merge_intersect(table, dual.key(), &mut result, idx.block(slot));
    }
    result
}

// =============================================================================
// NEXT-CLOSURE STEP PRIMITIVES
// =============================================================================

/// Candidate pre-closure A+i: the elements of `set` whose block slot is
/// smaller than `probe`, followed by the representative row of `probe`'s
/// block. No closure is taken here.
///
/// `probe` must be a non-empty block slot (probe advancement skips empty
/// blocks).
#[must_use]
pub fn a_plus_i(idx: &SortedIndex, set: &[u32], probe: usize) -> Vec<u32> {
    let mut candidate: Vec<u32> = set
        .iter()
        .take_while(|&&row| idx.slot_of(row) < probe)
        .copied()
        .collect();
    candidate.extend(idx.block(probe).first().copied());
    candidate
}

/// Canonical Next-Closure acceptance test: `probe` must be the smallest
/// element of `new` not already in `old`. Rejecting other candidates is what
/// keeps every closed set from being enumerated more than once.
#[must_use]
pub fn is_lectic_successor(idx: &SortedIndex, old: &[u32], new: &[u32], probe: usize) -> bool {
    let mut j = 0usize;
    while j < old.len() && j < new.len() && idx.slot_of(old[j]) == idx.slot_of(new[j]) {
        j += 1;
    }
    j < new.len()
        && idx.slot_of(new[j]) == probe
        && (j >= old.len() || idx.slot_of(new[j]) < idx.slot_of(old[j]))
}

/// Lower `probe` past every slot already contained in `set` (and past empty
/// blocks). Returns `None` when no admissible slot remains — the enumeration
/// has reached its fixed point.
#[must_use]
pub fn skip_contained(idx: &SortedIndex, set: &[u32], mut probe: usize) -> Option<usize> {
    while contains_slot(idx, set, probe) {
        probe = idx.step_down(probe)?;
    }
    Some(probe)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SortKey;
    use crate::relation::{Relation, TripleTable};
    use crate::types::Dimension;

    fn indices(rel: &Relation) -> (SortedIndex, SortedIndex) {
        let u_idx = SortedIndex::build(
            rel,
            SortKey::Single(Dimension::U),
            SortKey::Pair(Dimension::T, Dimension::R),
            rel.cardinality(Dimension::U),
        )
        .expect("u index");
        let tr_idx = SortedIndex::build(
            rel,
            SortKey::Pair(Dimension::T, Dimension::R),
            SortKey::Single(Dimension::U),
            0,
        )
        .expect("tr index");
        (u_idx, tr_idx)
    }

    fn u_values(rel: &Relation, set: &[u32]) -> Vec<u32> {
        set.iter().map(|&row| rel.value(row, Dimension::U)).collect()
    }

    #[test]
    fn prime_of_empty_set_is_full_dual_domain() {
        let rel =
            Relation::from_triples(vec![[1, 1, 1], [2, 1, 1], [2, 2, 1]]).expect("relation");
        let (u_idx, tr_idx) = indices(&rel);
        // empty U-set derives to all (t,r) pairs: (1,1) and (2,1)
        let derived = prime(&rel, &u_idx, &tr_idx, &[]);
        assert_eq!(derived.len(), 2);
        // empty TR-set derives to all u values
        let derived = prime(&rel, &tr_idx, &u_idx, &[]);
        assert_eq!(u_values(&rel, &derived), vec![1, 2]);
    }

    #[test]
    fn prime_derives_common_pairs() {
        // u=1 has pairs {(1,1),(2,2)}, u=2 has {(1,1),(2,1)}
        let rel = Relation::from_triples(vec![[1, 1, 1], [1, 2, 2], [2, 1, 1], [2, 2, 1]])
            .expect("relation");
        let (u_idx, tr_idx) = indices(&rel);
        // derive {u1, u2}: rows 0 and 2 are representatives of the two blocks
        let derived = prime(&rel, &u_idx, &tr_idx, &[0, 2]);
        assert_eq!(derived.len(), 1);
        let row = derived[0];
        assert_eq!(rel.value(row, Dimension::T), 1);
        assert_eq!(rel.value(row, Dimension::R), 1);
    }

    #[test]
    fn double_prime_is_idempotent() {
        let rel = Relation::from_triples(vec![
            [1, 1, 1],
            [1, 2, 2],
            [2, 1, 1],
            [2, 2, 1],
            [3, 2, 2],
        ])
        .expect("relation");
        let (u_idx, tr_idx) = indices(&rel);
        // close {u1}: representative is any row of block 0
        let seed = vec![0u32];
        let derived = prime(&rel, &u_idx, &tr_idx, &seed);
        let closed = prime(&rel, &tr_idx, &u_idx, &derived);
        // closing again must reproduce the same set of u values
        let derived2 = prime(&rel, &u_idx, &tr_idx, &closed);
        let closed2 = prime(&rel, &tr_idx, &u_idx, &derived2);
        assert_eq!(u_values(&rel, &closed), u_values(&rel, &closed2));
    }

    #[test]
    fn a_plus_i_keeps_prefix_below_probe() {
        let rel = Relation::from_triples(vec![[1, 1, 1], [2, 1, 1], [3, 1, 1], [4, 1, 1]])
            .expect("relation");
        let (u_idx, _) = indices(&rel);
        // set {u1, u3} (rows 0, 2), probe slot 3 (u4)
        let candidate = a_plus_i(&u_idx, &[0, 2], 3);
        assert_eq!(u_values(&rel, &candidate), vec![1, 3, 4]);
        // probe slot 1 (u2) cuts the set after u1
        let candidate = a_plus_i(&u_idx, &[0, 2], 1);
        assert_eq!(u_values(&rel, &candidate), vec![1, 2]);
    }

    #[test]
    fn lectic_successor_accepts_only_smallest_new_element() {
        let rel = Relation::from_triples(vec![[1, 1, 1], [2, 1, 1], [3, 1, 1], [4, 1, 1]])
            .expect("relation");
        let (u_idx, _) = indices(&rel);
        // old {u1}, new {u1,u3}: probe u3 is the smallest new element
        assert!(is_lectic_successor(&u_idx, &[0], &[0, 2], 2));
        // old {u1}, new {u1,u2,u3}: probe u3 is not the smallest new element
        assert!(!is_lectic_successor(&u_idx, &[0], &[0, 1, 2], 2));
        // old {}, new {u2}: probe u2 accepted
        assert!(is_lectic_successor(&u_idx, &[], &[1], 1));
        // closure lost the probe entirely
        assert!(!is_lectic_successor(&u_idx, &[0], &[0], 2));
    }

    #[test]
    fn skip_contained_lowers_probe_past_set_members() {
        let rel = Relation::from_triples(vec![[1, 1, 1], [2, 1, 1], [3, 1, 1], [4, 1, 1]])
            .expect("relation");
        let (u_idx, _) = indices(&rel);
        // probe u4 not contained: unchanged
        assert_eq!(skip_contained(&u_idx, &[0, 1], 3), Some(3));
        // probe u2 contained, u1 contained: lands on... u2 -> u1 -> none below
        assert_eq!(skip_contained(&u_idx, &[0, 1], 1), None);
        // probe u3 with set {u2,u3}: lands on u1
        assert_eq!(skip_contained(&u_idx, &[1, 2], 2), Some(0));
    }
}
