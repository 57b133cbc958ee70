//! # Sorted Index / Offset Table
//!
//! A [`SortedIndex`] is a permutation of row positions grouped by a sort key
//! (one dimension, or an ordered dimension pair), an offset table mapping
//! each distinct key value to its contiguous block in the permutation, and a
//! reverse lookup from row position to block slot.
//!
//! Within a block, rows are ordered by the *dual* key, so that blocks can be
//! merge-intersected directly during Galois derivation. Indices are built
//! once per scope and never mutated afterwards; the outer loop's indices and
//! every inner loop's restricted indices are independent values.

use crate::relation::TripleTable;
use crate::types::{Dimension, TriasError};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// =============================================================================
// SORT KEY
// =============================================================================

/// Key projection a [`SortedIndex`] groups rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// A single dimension; blocks are domain values `1..=cardinality`,
    /// including empty blocks for values with no rows.
    Single(Dimension),
    /// An ordered dimension pair; blocks are the distinct value pairs that
    /// actually occur, in ascending pair order.
    Pair(Dimension, Dimension),
}

impl SortKey {
    /// Compare two rows by this key projection only.
    pub fn cmp_rows<T: TripleTable>(self, table: &T, a: u32, b: u32) -> Ordering {
        match self {
            SortKey::Single(dim) => table.value(a, dim).cmp(&table.value(b, dim)),
            SortKey::Pair(first, second) => table
                .value(a, first)
                .cmp(&table.value(b, first))
                .then_with(|| table.value(a, second).cmp(&table.value(b, second))),
        }
    }
}

// =============================================================================
// SORTED INDEX
// =============================================================================

/// Permutation + offset table over a [`TripleTable`] for one sort key.
#[derive(Debug, Clone)]
pub struct SortedIndex {
    key: SortKey,
    /// Permutation of row positions: equal key values contiguous, blocks
    /// ascending by key, rows within a block ascending by the dual key.
    order: Vec<u32>,
    /// Block boundaries: block `k` is `order[starts[k]..starts[k + 1]]`.
    starts: Vec<u32>,
    /// Row position -> 0-based block slot.
    slot_of: Vec<u32>,
    /// For pair keys: value pair -> block slot.
    pair_slots: BTreeMap<(u32, u32), u32>,
}

impl SortedIndex {
    /// Build the index for `key`, tie-breaking the permutation by `tie` (the
    /// dual side's key) and finally by row position.
    ///
    /// `num_values` bounds the block count for single-dimension keys (the
    /// domain cardinality); a row whose key value falls outside `1..=num_values`
    /// makes the build fail with [`TriasError::IndexOverflow`] — inconsistent
    /// cardinality input, not recoverable.
    pub fn build<T: TripleTable>(
        table: &T,
        key: SortKey,
        tie: SortKey,
        num_values: u32,
    ) -> Result<Self, TriasError> {
        let n = table.len();
        let mut order: Vec<u32> = (0..n as u32).collect();
        order.sort_unstable_by(|&a, &b| {
            key.cmp_rows(table, a, b)
                .then_with(|| tie.cmp_rows(table, a, b))
                .then_with(|| a.cmp(&b))
        });

        match key {
            SortKey::Single(dim) => {
                let blocks = num_values as usize;
                let mut starts = vec![0u32; blocks + 1];
                let mut pos = 0usize;
                for value in 1..=num_values {
                    starts[(value - 1) as usize] = pos as u32;
                    while pos < n && table.value(order[pos], dim) == value {
                        pos += 1;
                    }
                }
                starts[blocks] = n as u32;
                if pos < n {
                    // some row carries a key value outside 1..=num_values
                    return Err(TriasError::IndexOverflow {
                        blocks: blocks + 1,
                        limit: blocks,
                    });
                }
                let slot_of = (0..n as u32)
                    .map(|row| table.value(row, dim) - 1)
                    .collect();
                Ok(Self {
                    key,
                    order,
                    starts,
                    slot_of,
                    pair_slots: BTreeMap::new(),
                })
            }
            SortKey::Pair(first, second) => {
                let mut starts: Vec<u32> = Vec::new();
                let mut pair_slots = BTreeMap::new();
                let mut pos = 0usize;
                while pos < n {
                    let row = order[pos];
                    let pair = (table.value(row, first), table.value(row, second));
                    pair_slots.insert(pair, starts.len() as u32);
                    starts.push(pos as u32);
                    while pos < n
                        && table.value(order[pos], first) == pair.0
                        && table.value(order[pos], second) == pair.1
                    {
                        pos += 1;
                    }
                }
                if starts.len() > n {
                    return Err(TriasError::IndexOverflow {
                        blocks: starts.len(),
                        limit: n,
                    });
                }
                starts.push(n as u32);
                let mut slot_of = Vec::with_capacity(n);
                for row in 0..n as u32 {
                    let pair = (table.value(row, first), table.value(row, second));
                    let slot = pair_slots.get(&pair).copied().ok_or_else(|| {
                        TriasError::Internal(format!("pair {pair:?} missing from offset map"))
                    })?;
                    slot_of.push(slot);
                }
                Ok(Self {
                    key,
                    order,
                    starts,
                    slot_of,
                    pair_slots,
                })
            }
        }
    }

    /// The key this index groups by.
    #[must_use]
    pub const fn key(&self) -> SortKey {
        self.key
    }

    /// Number of key blocks (single keys: the domain cardinality; pair keys:
    /// the number of distinct pairs in the table).
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.starts.len() - 1
    }

    /// Row positions of block `slot`, ordered by the dual key.
    #[must_use]
    pub fn block(&self, slot: usize) -> &[u32] {
        &self.order[self.starts[slot] as usize..self.starts[slot + 1] as usize]
    }

    /// Number of rows in block `slot`.
    #[must_use]
    pub fn block_len(&self, slot: usize) -> usize {
        (self.starts[slot + 1] - self.starts[slot]) as usize
    }

    /// Block slot of the given row position.
    #[must_use]
    pub fn slot_of(&self, row: u32) -> usize {
        self.slot_of[row as usize] as usize
    }

    /// Block slot of a value pair, for pair-keyed indices.
    #[must_use]
    pub fn pair_slot(&self, first: u32, second: u32) -> Option<usize> {
        self.pair_slots.get(&(first, second)).map(|&s| s as usize)
    }

    /// Largest slot with a non-empty block, if any.
    #[must_use]
    pub fn last_nonempty_slot(&self) -> Option<usize> {
        (0..self.num_blocks()).rev().find(|&s| self.block_len(s) > 0)
    }

    /// Largest non-empty slot strictly below `slot`, if any.
    #[must_use]
    pub fn step_down(&self, slot: usize) -> Option<usize> {
        (0..slot).rev().find(|&s| self.block_len(s) > 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
