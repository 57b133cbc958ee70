//! # Triadic Next-Closure Miner
//!
//! Computes all triadic concepts (A, B, C) of a ternary relation whose
//! per-dimension supports meet the configured minima.
//!
//! The outer Next-Closure enumerates closed U-subsets against the dyadic
//! context (U, T×R); for every accepted extent the inner Next-Closure runs
//! over a fresh restricted (T, R) sub-context and emits every (intent, modus)
//! pair that passes the triadic validity condition A = (B×C)'.
//!
//! The enumeration is single-threaded and pure: all I/O goes through the
//! [`ConceptWriter`] and [`ProgressLogger`] collaborators.

use crate::closure::{a_plus_i, is_lectic_successor, prime, skip_contained};
use crate::index::{SortKey, SortedIndex};
use crate::progress::{ProgressLogger, ProgressStep};
use crate::relation::{Relation, TripleTable};
use crate::set::is_subset;
use crate::subcontext::SubRelation;
use crate::types::{Dimension, TriConcept, TriasError};
use crate::writer::ConceptWriter;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// MINER
// =============================================================================

/// The Next-Closure enumeration engine.
///
/// Holds the immutable relation, the two global indices (by U and by T×R)
/// and the three minimum-support thresholds. All state of a run lives on the
/// stack of [`TriasMiner::run`]; a miner can run repeatedly and is never
/// mutated.
#[derive(Debug)]
pub struct TriasMiner {
    rel: Relation,
    min_support: [u32; 3],
    u_idx: SortedIndex,
    tr_idx: SortedIndex,
}

impl TriasMiner {
    /// Build the miner and its global index pair.
    pub fn new(rel: Relation, min_support: [u32; 3]) -> Result<Self, TriasError> {
        let u_idx = SortedIndex::build(
            &rel,
            SortKey::Single(Dimension::U),
            SortKey::Pair(Dimension::T, Dimension::R),
            rel.cardinality(Dimension::U),
        )?;
        let tr_idx = SortedIndex::build(
            &rel,
            SortKey::Pair(Dimension::T, Dimension::R),
            SortKey::Single(Dimension::U),
            0,
        )?;
        Ok(Self {
            rel,
            min_support,
            u_idx,
            tr_idx,
        })
    }

    /// The relation being mined.
    #[must_use]
    pub const fn relation(&self) -> &Relation {
        &self.rel
    }

    fn min(&self, dim: Dimension) -> u32 {
        self.min_support[dim.index()]
    }

    fn full_domain(&self, dim: Dimension) -> Vec<u32> {
        (1..=self.rel.cardinality(dim)).collect()
    }

    /// Run the enumeration, emitting every valid concept to `writer` and
    /// closing it after the last one.
    pub fn run<W: ConceptWriter, P: ProgressLogger>(
        &self,
        writer: &mut W,
        progress: &mut P,
    ) -> Result<(), TriasError> {
        progress.set_max(self.rel.cardinality(Dimension::U));
        progress.step(ProgressStep::Start);
        self.emit_degenerate_concepts(writer)?;
        if !self.rel.is_empty() {
            self.outer_loop(writer, progress)?;
        }
        progress.step(ProgressStep::Stop);
        writer.close()
    }

    // =========================================================================
    // OUTER NEXT-CLOSURE
    // =========================================================================

    fn outer_loop<W: ConceptWriter, P: ProgressLogger>(
        &self,
        writer: &mut W,
        progress: &mut P,
    ) -> Result<(), TriasError> {
        // hull of the empty set: {}' and {}''
        let mut outer_intent = prime(&self.rel, &self.u_idx, &self.tr_idx, &[]);
        let mut extent = prime(&self.rel, &self.tr_idx, &self.u_idx, &outer_intent);
        // an empty hull carries no inner concepts: the only concept with an
        // empty extent has full dual domains and is emitted up front
        if !extent.is_empty() && extent.len() as u32 >= self.min(Dimension::U) {
            self.inner_loop(&extent, &outer_intent, writer, progress)?;
        }

        let Some(top) = self.u_idx.last_nonempty_slot() else {
            return Ok(());
        };
        let mut probe = top;
        loop {
            if extent.len() >= self.u_idx.num_blocks() {
                break; // extent covers all of U
            }
            probe = match skip_contained(&self.u_idx, &extent, probe) {
                Some(p) => p,
                None => break, // fixed point: no admissible probe remains
            };
            progress.step(ProgressStep::Outer);

            let candidate = a_plus_i(&self.u_idx, &extent, probe);
            if let Some(&first) = candidate.first() {
                progress.extent_element(self.rel.value(first, Dimension::U));
            }
            let derived = prime(&self.rel, &self.u_idx, &self.tr_idx, &candidate);

            let mut accepted = false;
            let product_threshold =
                u64::from(self.min(Dimension::T)) * u64::from(self.min(Dimension::R));
            if derived.len() as u64 >= product_threshold {
                let closed = prime(&self.rel, &self.tr_idx, &self.u_idx, &derived);
                if is_lectic_successor(&self.u_idx, &extent, &closed, probe) {
                    extent = closed;
                    outer_intent = derived;
                    accepted = true;
                    if extent.len() as u32 >= self.min(Dimension::U) {
                        progress.step(ProgressStep::OuterSuccess);
                        self.inner_loop(&extent, &outer_intent, writer, progress)?;
                    }
                    if extent.len() >= self.u_idx.num_blocks() {
                        break;
                    }
                    probe = top;
                }
            }
            if !accepted {
                probe = match self.u_idx.step_down(probe) {
                    Some(p) => p,
                    None => break,
                };
            }
        }
        Ok(())
    }

    // =========================================================================
    // INNER NEXT-CLOSURE
    // =========================================================================

    /// Enumerate the (intent, modus) pairs for one fixed extent.
    ///
    /// `relation_rows` is the extent's T×R derivation: one representative
    /// global row per (t, r) pair related to every extent element.
    fn inner_loop<W: ConceptWriter, P: ProgressLogger>(
        &self,
        extent: &[u32],
        relation_rows: &[u32],
        writer: &mut W,
        progress: &mut P,
    ) -> Result<(), TriasError> {
        if relation_rows.is_empty() {
            // full extent with an empty derivation: its concepts carry an
            // empty intent or modus and are emitted up front
            return Ok(());
        }

        let sub = SubRelation::build(&self.rel, relation_rows);
        let t_idx = SortedIndex::build(
            &sub,
            SortKey::Single(Dimension::T),
            SortKey::Single(Dimension::R),
            sub.t_count(),
        )?;
        let r_idx = SortedIndex::build(
            &sub,
            SortKey::Single(Dimension::R),
            SortKey::Single(Dimension::T),
            sub.r_count(),
        )?;

        // hull of the empty T-set
        let mut intent: Vec<u32> = Vec::new();
        let initial_modus = prime(&sub, &t_idx, &r_idx, &intent);
        if initial_modus.len() as u32 >= self.min(Dimension::R) {
            intent = prime(&sub, &r_idx, &t_idx, &initial_modus);
            if !intent.is_empty()
                && intent.len() as u32 >= self.min(Dimension::T)
                && self.validate(extent, &intent, &initial_modus, &sub)?
            {
                self.emit(extent, &intent, &initial_modus, &sub, writer)?;
            }
        }

        let Some(top) = t_idx.last_nonempty_slot() else {
            return Ok(());
        };
        let mut probe = top;
        loop {
            if intent.len() >= t_idx.num_blocks() {
                break; // intent covers all of T
            }
            probe = match skip_contained(&t_idx, &intent, probe) {
                Some(p) => p,
                None => break,
            };
            progress.step(ProgressStep::Inner);

            let candidate = a_plus_i(&t_idx, &intent, probe);
            let modus = prime(&sub, &t_idx, &r_idx, &candidate);

            let mut accepted = false;
            if modus.len() as u32 >= self.min(Dimension::R) {
                let closed = prime(&sub, &r_idx, &t_idx, &modus);
                if is_lectic_successor(&t_idx, &intent, &closed, probe) {
                    intent = closed;
                    accepted = true;
                    if !modus.is_empty()
                        && intent.len() as u32 >= self.min(Dimension::T)
                        && self.validate(extent, &intent, &modus, &sub)?
                    {
                        progress.step(ProgressStep::InnerSuccess);
                        self.emit(extent, &intent, &modus, &sub, writer)?;
                    }
                    if intent.len() >= t_idx.num_blocks() {
                        break;
                    }
                    probe = top;
                }
            }
            if !accepted {
                probe = match t_idx.step_down(probe) {
                    Some(p) => p,
                    None => break,
                };
            }
        }
        Ok(())
    }

    // =========================================================================
    // VALIDATION & EMISSION
    // =========================================================================

    /// Check the triadic validity condition A = (B×C)'.
    ///
    /// D ⊆ A decides acceptance; A ⊆ D holds by construction and its
    /// violation is an internal-consistency error.
    fn validate(
        &self,
        extent: &[u32],
        intent: &[u32],
        modus: &[u32],
        sub: &SubRelation,
    ) -> Result<bool, TriasError> {
        let mut product = Vec::with_capacity(intent.len() * modus.len());
        for &b in intent {
            let t = sub.value(b, Dimension::T);
            for &c in modus {
                let r = sub.value(c, Dimension::R);
                let row = sub.pair_row(t, r).ok_or_else(|| {
                    TriasError::Internal(format!(
                        "closed pair ({t}, {r}) missing from restricted relation"
                    ))
                })?;
                product.push(row);
            }
        }
        let derived = prime(&self.rel, &self.tr_idx, &self.u_idx, &product);

        let u_key = SortKey::Single(Dimension::U);
        if !is_subset(&self.rel, u_key, &derived, extent) {
            return Ok(false);
        }
        if !is_subset(&self.rel, u_key, extent, &derived) {
            return Err(TriasError::Internal(
                "extent not contained in its cross-product derivation".to_string(),
            ));
        }
        Ok(true)
    }

    /// Map internal index sets back to domain values and hand the concept to
    /// the writer. Emission order is discovery order.
    fn emit<W: ConceptWriter>(
        &self,
        extent: &[u32],
        intent: &[u32],
        modus: &[u32],
        sub: &SubRelation,
        writer: &mut W,
    ) -> Result<(), TriasError> {
        let concept = TriConcept::new(
            extent
                .iter()
                .map(|&row| self.rel.value(row, Dimension::U))
                .collect(),
            intent
                .iter()
                .map(|&b| self.rel.value(sub.global_row(b), Dimension::T))
                .collect(),
            modus
                .iter()
                .map(|&c| self.rel.value(sub.global_row(c), Dimension::R))
                .collect(),
        );
        writer.write(&concept)
    }

    /// True if some value of `dim` is related to every pair of the full
    /// declared dual product.
    fn covers_full_dual_product(&self, dim: Dimension) -> bool {
        let (first, second) = match dim {
            Dimension::U => (Dimension::T, Dimension::R),
            Dimension::T => (Dimension::U, Dimension::R),
            Dimension::R => (Dimension::U, Dimension::T),
        };
        let product = u64::from(self.rel.cardinality(first))
            * u64::from(self.rel.cardinality(second));
        if product == 0 {
            return true; // an empty product is covered vacuously
        }
        let mut covered: BTreeMap<u32, BTreeSet<(u32, u32)>> = BTreeMap::new();
        for row in 0..self.rel.len() as u32 {
            covered
                .entry(self.rel.value(row, dim))
                .or_default()
                .insert((self.rel.value(row, first), self.rel.value(row, second)));
        }
        covered.values().any(|pairs| pairs.len() as u64 == product)
    }

    /// Concepts with an empty component. An empty component makes the cross
    /// product empty, so the other two components close to their full
    /// declared domains; each candidate is a concept exactly when no value
    /// of the empty dimension covers the full dual product. The loops never
    /// emit these, and the empty relation is the vacuous case.
    fn emit_degenerate_concepts<W: ConceptWriter>(&self, writer: &mut W) -> Result<(), TriasError> {
        let [card_u, card_t, card_r] = self.rel.cardinalities();
        if self.min(Dimension::U) == 0
            && card_t >= self.min(Dimension::T)
            && card_r >= self.min(Dimension::R)
            && !self.covers_full_dual_product(Dimension::U)
        {
            writer.write(&TriConcept::new(
                Vec::new(),
                self.full_domain(Dimension::T),
                self.full_domain(Dimension::R),
            ))?;
        }
        if self.min(Dimension::T) == 0
            && card_u >= self.min(Dimension::U)
            && card_r >= self.min(Dimension::R)
            && !self.covers_full_dual_product(Dimension::T)
        {
            writer.write(&TriConcept::new(
                self.full_domain(Dimension::U),
                Vec::new(),
                self.full_domain(Dimension::R),
            ))?;
        }
        if self.min(Dimension::R) == 0
            && card_u >= self.min(Dimension::U)
            && card_t >= self.min(Dimension::T)
            && !self.covers_full_dual_product(Dimension::R)
        {
            writer.write(&TriConcept::new(
                self.full_domain(Dimension::U),
                self.full_domain(Dimension::T),
                Vec::new(),
            ))?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
