//! # Restricted Sub-Relation
//!
//! For each accepted outer extent, the inner Next-Closure loop runs over a
//! private dyadic context: the (t, r) pairs derived from that extent,
//! renumbered densely and indexed from scratch. Nothing here aliases the
//! outer loop's indices; a `SubRelation` lives exactly as long as one inner
//! invocation.

use crate::relation::{Relation, TripleTable};
use crate::types::Dimension;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// SUB-RELATION
// =============================================================================

/// The restriction of the global relation to one extent's derived (t, r)
/// pairs, with locally dense T/R numbering.
///
/// Row layout mirrors the global relation's column scheme: column `U` holds
/// the *global row position* the local row came from (so permutation
/// tie-breaks stay deterministic), columns `T`/`R` hold local values. Every
/// local (t, r) pair is distinct by construction: the source set carries one
/// representative row per pair.
#[derive(Debug)]
pub struct SubRelation {
    rows: Vec<[u32; 3]>,
    t_count: u32,
    r_count: u32,
    /// Local (t, r) pair -> global row position, for cross-product building
    /// during concept validation.
    pair_rows: BTreeMap<(u32, u32), u32>,
}

impl SubRelation {
    /// Build the restriction from `source_rows`, a set of global row
    /// positions carrying one representative per (t, r) pair.
    #[must_use]
    pub fn build(rel: &Relation, source_rows: &[u32]) -> Self {
        let mut t_values = BTreeSet::new();
        let mut r_values = BTreeSet::new();
        for &row in source_rows {
            t_values.insert(rel.value(row, Dimension::T));
            r_values.insert(rel.value(row, Dimension::R));
        }

        // dense local numbering, ascending with the global values
        let t_map: BTreeMap<u32, u32> = t_values
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as u32 + 1))
            .collect();
        let r_map: BTreeMap<u32, u32> = r_values
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as u32 + 1))
            .collect();

        let mut rows = Vec::with_capacity(source_rows.len());
        let mut pair_rows = BTreeMap::new();
        for &row in source_rows {
            let t = t_map[&rel.value(row, Dimension::T)];
            let r = r_map[&rel.value(row, Dimension::R)];
            pair_rows.insert((t, r), row);
            rows.push([row, t, r]);
        }

        Self {
            rows,
            t_count: t_map.len() as u32,
            r_count: r_map.len() as u32,
            pair_rows,
        }
    }

    /// Number of distinct local T values.
    #[must_use]
    pub const fn t_count(&self) -> u32 {
        self.t_count
    }

    /// Number of distinct local R values.
    #[must_use]
    pub const fn r_count(&self) -> u32 {
        self.r_count
    }

    /// Global row position a local row came from.
    #[must_use]
    pub fn global_row(&self, local_row: u32) -> u32 {
        self.rows[local_row as usize][0]
    }

    /// Global row position of a local (t, r) pair, if the pair occurs.
    #[must_use]
    pub fn pair_row(&self, t: u32, r: u32) -> Option<u32> {
        self.pair_rows.get(&(t, r)).copied()
    }
}

impl TripleTable for SubRelation {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: u32, dim: Dimension) -> u32 {
        self.rows[row as usize][dim.index()]
    }
}

// =============================================================================
// TESTS
// =============================================================================
