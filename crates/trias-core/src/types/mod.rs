//! # Core Type Definitions
//!
//! This module contains the shared types of the Trias mining engine:
//! - The three relation dimensions (`Dimension`)
//! - The output structure (`TriConcept`)
//! - Error types (`TriasError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// DIMENSIONS
// =============================================================================

/// The three dimensions of a ternary relation Y ⊆ U×T×R.
///
/// Historically U = users, T = tags, R = resources; the engine treats them
/// as three anonymous discrete domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// First dimension (concept extents are drawn from it).
    U,
    /// Second dimension (concept intents).
    T,
    /// Third dimension (concept modi).
    R,
}

impl Dimension {
    /// All dimensions in column order.
    pub const ALL: [Dimension; 3] = [Dimension::U, Dimension::T, Dimension::R];

    /// Column index of this dimension in a triple row.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Dimension::U => 0,
            Dimension::T => 1,
            Dimension::R => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::U => write!(f, "U"),
            Dimension::T => write!(f, "T"),
            Dimension::R => write!(f, "R"),
        }
    }
}

// =============================================================================
// TRI-CONCEPT
// =============================================================================

/// A triadic formal concept: a mutually closed triple of value sets.
///
/// Each set holds 1-numbered domain values in ascending order. A concept is
/// immutable once emitted; the miner never revisits or mutates it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TriConcept {
    /// Extent A ⊆ U.
    pub extent: Vec<u32>,
    /// Intent B ⊆ T.
    pub intent: Vec<u32>,
    /// Modus C ⊆ R.
    pub modus: Vec<u32>,
}

impl TriConcept {
    /// Create a new concept from its three value sets.
    #[must_use]
    pub const fn new(extent: Vec<u32>, intent: Vec<u32>, modus: Vec<u32>) -> Self {
        Self {
            extent,
            intent,
            modus,
        }
    }

    /// Support of the concept in the given dimension (projection cardinality).
    #[must_use]
    pub fn support(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::U => self.extent.len(),
            Dimension::T => self.intent.len(),
            Dimension::R => self.modus.len(),
        }
    }

    /// Volume of the concept box |A|·|B|·|C|.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.extent.len() * self.intent.len() * self.modus.len()
    }
}

impl fmt::Display for TriConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_set(f: &mut fmt::Formatter<'_>, set: &[u32]) -> fmt::Result {
            write!(f, "{{")?;
            for (i, v) in set.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, "}}")
        }
        write!(f, "(")?;
        write_set(f, &self.extent)?;
        write!(f, ", ")?;
        write_set(f, &self.intent)?;
        write!(f, ", ")?;
        write_set(f, &self.modus)?;
        write!(f, ")")
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while loading a relation or mining concepts.
///
/// - No silent failures
/// - Internal-consistency variants indicate an index-construction bug, not a
///   data problem; callers should abort the run when they see one
#[derive(Debug, Error)]
pub enum TriasError {
    /// A triple carries a value outside the declared cardinality of its
    /// dimension.
    #[error("row {row}: dimension {dim} value {value} outside 1..={cardinality}")]
    ValueOutOfRange {
        /// Row position of the offending triple.
        row: usize,
        /// Dimension of the offending value.
        dim: Dimension,
        /// The offending value.
        value: u32,
        /// Declared cardinality of the dimension.
        cardinality: u32,
    },

    /// Offset-table construction discovered more key blocks than the domain
    /// cardinality permits. Fatal: the cardinality input was inconsistent.
    #[error("offset table overflow: {blocks} key blocks exceed limit {limit}")]
    IndexOverflow {
        /// Number of blocks discovered.
        blocks: usize,
        /// Maximum number of blocks permitted by the configuration.
        limit: usize,
    },

    /// An internal invariant of the enumeration was violated. Fatal: this is
    /// a bug in the engine, never a recoverable condition.
    #[error("internal consistency violation: {0}")]
    Internal(String),

    /// An input line could not be parsed as a triple.
    #[error("input line {line}: {reason}")]
    MalformedInput {
        /// 1-based line number of the offending input line.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },

    /// The configuration is incomplete or contradictory.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error from a reader, writer or progress collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// TESTS
// =============================================================================
