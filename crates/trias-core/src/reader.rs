//! # Delimited Triple Reader
//!
//! Parses a ternary relation from delimited text: one `u t r` triple per
//! line. Blank lines and `#` comment lines are skipped, duplicate triples are
//! dropped (first occurrence wins) and, under [`Numbering::Holes`], sparse
//! identifiers are renumbered densely with the inverse maps kept for output
//! translation.

use crate::relation::Relation;
use crate::types::TriasError;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

// =============================================================================
// NUMBERING MODES
// =============================================================================

/// How input identifiers relate to the engine's dense 1..N numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    /// Input values are already dense 1..N per dimension and are used as-is.
    #[default]
    Dense,
    /// Input values are arbitrary positive integers; the reader renumbers
    /// them densely in encounter order and records the inverse maps.
    Holes,
}

/// A parsed relation plus, under [`Numbering::Holes`], the per-dimension
/// inverse maps from dense engine values back to original identifiers.
#[derive(Debug)]
pub struct ParsedRelation {
    /// The relation, dense-numbered and validated.
    pub relation: Relation,
    /// `inverse[d][dense] = original`, present only for `Numbering::Holes`.
    pub inverse: Option<[BTreeMap<u32, u32>; 3]>,
}

// =============================================================================
// READER
// =============================================================================

/// Reads triples from delimited text.
///
/// With `delimiter = None` any run of ASCII whitespace separates fields;
/// with `Some(c)` each occurrence of `c` does.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedReader {
    delimiter: Option<char>,
    numbering: Numbering,
}

impl DelimitedReader {
    /// Create a reader with the given field delimiter and numbering mode.
    #[must_use]
    pub const fn new(delimiter: Option<char>, numbering: Numbering) -> Self {
        Self {
            delimiter,
            numbering,
        }
    }

    /// Read all triples from `input`.
    ///
    /// `cardinalities` declares the per-dimension domain sizes; `None`
    /// derives them from the data. Under [`Numbering::Holes`] an explicit
    /// declaration is rejected, since dense sizes cannot be known up front.
    pub fn read<R: BufRead>(
        &self,
        input: R,
        cardinalities: Option<[u32; 3]>,
    ) -> Result<ParsedRelation, TriasError> {
        let triples = self.parse_triples(input)?;
        match self.numbering {
            Numbering::Dense => {
                let relation = match cardinalities {
                    Some(cards) => Relation::new(triples, cards)?,
                    None => Relation::from_triples(triples)?,
                };
                Ok(ParsedRelation {
                    relation,
                    inverse: None,
                })
            }
            Numbering::Holes => {
                if cardinalities.is_some() {
                    return Err(TriasError::Config(
                        "explicit cardinalities cannot be combined with hole renumbering"
                            .to_string(),
                    ));
                }
                let (triples, inverse) = renumber(triples);
                Ok(ParsedRelation {
                    relation: Relation::from_triples(triples)?,
                    inverse: Some(inverse),
                })
            }
        }
    }

    fn parse_triples<R: BufRead>(&self, input: R) -> Result<Vec<[u32; 3]>, TriasError> {
        let mut triples = Vec::new();
        let mut seen = BTreeSet::new();
        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let triple = parse_line(trimmed, self.delimiter, i + 1)?;
            // first occurrence wins; row order of the survivors is preserved
            if seen.insert(triple) {
                triples.push(triple);
            }
        }
        Ok(triples)
    }
}

fn parse_line(line: &str, delimiter: Option<char>, line_no: usize) -> Result<[u32; 3], TriasError> {
    let mut fields: Vec<&str> = match delimiter {
        Some(c) => line.split(c).map(str::trim).collect(),
        None => line.split_ascii_whitespace().collect(),
    };
    fields.retain(|f| !f.is_empty());
    if fields.len() != 3 {
        return Err(TriasError::MalformedInput {
            line: line_no,
            reason: format!("expected 3 fields, found {}", fields.len()),
        });
    }
    let mut triple = [0u32; 3];
    for (slot, field) in triple.iter_mut().zip(&fields) {
        *slot = field.parse().map_err(|_| TriasError::MalformedInput {
            line: line_no,
            reason: format!("not a positive integer: {field:?}"),
        })?;
        if *slot == 0 {
            return Err(TriasError::MalformedInput {
                line: line_no,
                reason: "values are 1-numbered, found 0".to_string(),
            });
        }
    }
    Ok(triple)
}

/// Renumber each dimension densely in encounter order, returning the
/// rewritten triples and the dense-to-original inverse maps.
fn renumber(triples: Vec<[u32; 3]>) -> (Vec<[u32; 3]>, [BTreeMap<u32, u32>; 3]) {
    let mut forward: [BTreeMap<u32, u32>; 3] = Default::default();
    let mut inverse: [BTreeMap<u32, u32>; 3] = Default::default();
    let dense = triples
        .into_iter()
        .map(|triple| {
            let mut row = [0u32; 3];
            for (d, &original) in triple.iter().enumerate() {
                let next = forward[d].len() as u32 + 1;
                let dense_value = *forward[d].entry(original).or_insert(next);
                inverse[d].entry(dense_value).or_insert(original);
                row[d] = dense_value;
            }
            row
        })
        .collect();
    (dense, inverse)
}

// =============================================================================
// TESTS
// =============================================================================
