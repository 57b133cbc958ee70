//! # Concept Writers
//!
//! The miner hands every valid concept to a [`ConceptWriter`] collaborator
//! and calls `close` once after the last one. Writers own all external-domain
//! remapping and formatting; the miner itself never performs I/O elsewhere.

use crate::types::{TriasError, TriConcept};
use std::collections::BTreeMap;
use std::io::Write;

// =============================================================================
// CONCEPT WRITER TRAIT
// =============================================================================

/// Receiver of emitted concepts.
///
/// Concepts arrive in discovery order, which is not canonical; consumers that
/// need a stable order must sort on their side.
pub trait ConceptWriter {
    /// Receive one concept.
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError>;

    /// Flush and release resources after the last concept.
    fn close(&mut self) -> Result<(), TriasError>;
}

impl<W: ConceptWriter + ?Sized> ConceptWriter for Box<W> {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        (**self).write(concept)
    }

    fn close(&mut self) -> Result<(), TriasError> {
        (**self).close()
    }
}

// =============================================================================
// COLLECTING WRITER
// =============================================================================

/// Collects concepts in memory, for library callers and tests.
#[derive(Debug, Default)]
pub struct VecWriter {
    /// The concepts received so far, in discovery order.
    pub concepts: Vec<TriConcept>,
}

impl VecWriter {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConceptWriter for VecWriter {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        self.concepts.push(concept.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), TriasError> {
        Ok(())
    }
}

// =============================================================================
// DELIMITED TEXT WRITER
// =============================================================================

/// Writes one `A = {..},  B = {..},  C = {..}` line per concept, optionally
/// prefixed with the three support sizes.
#[derive(Debug)]
pub struct DelimitedWriter<W: Write> {
    writer: W,
    write_sizes: bool,
}

impl<W: Write> DelimitedWriter<W> {
    /// Wrap a stream.
    pub const fn new(writer: W, write_sizes: bool) -> Self {
        Self {
            writer,
            write_sizes,
        }
    }

    fn write_set(&mut self, label: &str, set: &[u32]) -> Result<(), TriasError> {
        write!(self.writer, "{label} = {{")?;
        for (i, v) in set.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ", ")?;
            }
            write!(self.writer, "{v}")?;
        }
        write!(self.writer, "}}")?;
        Ok(())
    }
}

impl<W: Write> ConceptWriter for DelimitedWriter<W> {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        if self.write_sizes {
            write!(
                self.writer,
                "{} {} {}\t",
                concept.extent.len(),
                concept.intent.len(),
                concept.modus.len()
            )?;
        }
        self.write_set("A", &concept.extent)?;
        write!(self.writer, ",  ")?;
        self.write_set("B", &concept.intent)?;
        write!(self.writer, ",  ")?;
        self.write_set("C", &concept.modus)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TriasError> {
        self.writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// INVERSE-MAPPED WRITER
// =============================================================================

/// Decorator translating dense internal values back to the original sparse
/// identifiers (the inverse of the reader's "holes" remapping) before
/// delegating to another writer.
#[derive(Debug)]
pub struct MappedWriter<W: ConceptWriter> {
    inner: W,
    inverse: [BTreeMap<u32, u32>; 3],
}

impl<W: ConceptWriter> MappedWriter<W> {
    /// Wrap a writer with per-dimension inverse maps.
    #[must_use]
    pub const fn new(inner: W, inverse: [BTreeMap<u32, u32>; 3]) -> Self {
        Self { inner, inverse }
    }

    /// Unwrap the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn map_set(map: &BTreeMap<u32, u32>, set: &[u32]) -> Result<Vec<u32>, TriasError> {
        set.iter()
            .map(|v| {
                map.get(v).copied().ok_or_else(|| {
                    TriasError::Internal(format!("value {v} missing from inverse mapping"))
                })
            })
            .collect()
    }
}

impl<W: ConceptWriter> ConceptWriter for MappedWriter<W> {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        let mapped = TriConcept::new(
            Self::map_set(&self.inverse[0], &concept.extent)?,
            Self::map_set(&self.inverse[1], &concept.intent)?,
            Self::map_set(&self.inverse[2], &concept.modus)?,
        );
        self.inner.write(&mapped)
    }

    fn close(&mut self) -> Result<(), TriasError> {
        self.inner.close()
    }
}

// =============================================================================
// TESTS
// =============================================================================
