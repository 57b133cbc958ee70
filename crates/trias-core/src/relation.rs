//! # Relation Store
//!
//! The immutable ternary relation the miner works on: a dense list of
//! integer triples, each domain value pre-numbered 1..N.
//!
//! Row position (0..n-1) is the stable identity used throughout the engine;
//! the triple list itself is never re-sorted. Sorted access goes through the
//! permutations of [`crate::index::SortedIndex`].

use crate::types::{Dimension, TriasError};

// =============================================================================
// TRIPLE TABLE TRAIT
// =============================================================================

/// Row-addressable table of integer triples.
///
/// Implemented by the global [`Relation`] and by the per-extent restricted
/// [`crate::subcontext::SubRelation`], so that the sorted index, the set
/// algebra and the closure operator work on both unchanged.
pub trait TripleTable {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Value of the given row in the given column.
    fn value(&self, row: u32, dim: Dimension) -> u32;

    /// True if the table has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// RELATION
// =============================================================================

/// The ternary relation Y ⊆ U×T×R as an append-only list of triples.
///
/// Values are 1-numbered per dimension; numbering sparse or non-integer
/// identifiers densely is the reader's job (see [`crate::reader`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    triples: Vec<[u32; 3]>,
    cardinalities: [u32; 3],
}

impl Relation {
    /// Create a relation with explicit per-dimension cardinalities.
    ///
    /// Every value must lie in `1..=cardinality` of its dimension; the miner
    /// relies on this and does not re-validate.
    pub fn new(triples: Vec<[u32; 3]>, cardinalities: [u32; 3]) -> Result<Self, TriasError> {
        for (row, triple) in triples.iter().enumerate() {
            for dim in Dimension::ALL {
                let value = triple[dim.index()];
                let cardinality = cardinalities[dim.index()];
                if value == 0 || value > cardinality {
                    return Err(TriasError::ValueOutOfRange {
                        row,
                        dim,
                        value,
                        cardinality,
                    });
                }
            }
        }
        Ok(Self {
            triples,
            cardinalities,
        })
    }

    /// Create a relation deriving each cardinality as the maximum value seen.
    pub fn from_triples(triples: Vec<[u32; 3]>) -> Result<Self, TriasError> {
        let mut cardinalities = [0u32; 3];
        for triple in &triples {
            for dim in Dimension::ALL {
                let value = triple[dim.index()];
                if value > cardinalities[dim.index()] {
                    cardinalities[dim.index()] = value;
                }
            }
        }
        Self::new(triples, cardinalities)
    }

    /// Cardinality of the given dimension.
    #[must_use]
    pub fn cardinality(&self, dim: Dimension) -> u32 {
        self.cardinalities[dim.index()]
    }

    /// All three cardinalities in column order.
    #[must_use]
    pub const fn cardinalities(&self) -> [u32; 3] {
        self.cardinalities
    }

    /// Iterate over the triples in row order.
    pub fn triples(&self) -> impl Iterator<Item = &[u32; 3]> {
        self.triples.iter()
    }
}

impl TripleTable for Relation {
    fn len(&self) -> usize {
        self.triples.len()
    }

    fn value(&self, row: u32, dim: Dimension) -> u32 {
        self.triples[row as usize][dim.index()]
    }
}

// =============================================================================
// TESTS
// =============================================================================
