//! # trias-core
//!
//! The deterministic Triadic Concept Analysis mining engine - THE LOGIC.
//!
//! This crate enumerates all triadic formal concepts of a ternary relation
//! Y ⊆ U×T×R whose per-dimension supports meet configured minima, using a
//! nested Next-Closure scheme: an outer loop over closed U-subsets and, per
//! accepted extent, an inner loop over closed T-subsets of the restricted
//! dyadic context.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure computation: all I/O goes through the reader, writer and
//!   progress collaborators at the crate boundary
//! - Is deterministic: integer arithmetic only, `BTreeMap`/`BTreeSet` for
//!   every keyed collection, identical output for identical input
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod closure;
pub mod index;
pub mod miner;
pub mod progress;
pub mod reader;
pub mod relation;
pub mod set;
pub mod subcontext;
pub mod types;
pub mod writer;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Dimension, TriConcept, TriasError};

// =============================================================================
// RE-EXPORTS: Mining Engine
// =============================================================================

pub use miner::TriasMiner;
pub use progress::{NoopProgress, ProgressLogger, ProgressStep, TagProgress};
pub use relation::{Relation, TripleTable};

// =============================================================================
// RE-EXPORTS: I/O Collaborators
// =============================================================================

pub use reader::{DelimitedReader, Numbering, ParsedRelation};
pub use writer::{ConceptWriter, DelimitedWriter, MappedWriter, VecWriter};
